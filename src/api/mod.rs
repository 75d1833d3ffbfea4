//! Thin request/response mapping to the hydra-engine backend.
//!
//! The backend owns persistence, validation and deployment orchestration;
//! this layer only shapes requests and decodes responses. Transport failures
//! surface as errors with context and are never retried automatically. There
//! is deliberately no request-staleness token or cancellation of in-flight
//! requests: overlapping calls resolve in arrival order and the later
//! response wins, matching the backend contract this client was built
//! against.

mod hydra;
mod wizard;

pub use hydra::HydraApi;
pub use wizard::WizardApi;

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_trailing_slashes() {
        assert_eq!(
            join_url("http://localhost:8000/", "api/hydra/tree"),
            "http://localhost:8000/api/hydra/tree"
        );
        assert_eq!(
            join_url("http://localhost:8000", "api/hydra/tree"),
            "http://localhost:8000/api/hydra/tree"
        );
    }
}
