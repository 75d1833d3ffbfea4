#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    pub constraint: String,
    pub message: String,
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.constraint, self.message)
    }
}

impl std::error::Error for ConstraintViolation {}
