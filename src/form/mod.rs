mod error;
mod validation;

pub use error::ConstraintViolation;
pub use validation::validate_field;
