use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One failed validation rule, attributed to a request field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collector for per-field validation failures. A request is rejected with
/// the full list, not just the first violation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError { field: field.to_string(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check a single rule and record the failure under `field`.
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(msg) = result {
            self.push(field, msg);
        }
    }

    pub fn into_result(self) -> Result<(), ModelError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ModelError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(ValidationErrors),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collector_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn collector_keeps_all_failures() {
        let mut errs = ValidationErrors::new();
        errs.check("name", Err("name is required".into()));
        errs.check("phone", Ok(()));
        errs.check("address", Err("address too long".into()));
        match errs.into_result() {
            Err(ModelError::Validation(v)) => {
                assert_eq!(v.0.len(), 2);
                assert_eq!(v.0[0].field, "name");
                assert_eq!(v.0[1].field, "address");
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }
}
