//! Business rule violations raised by the storefront entities.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input breaks a rule of the entity it describes
    #[error("{0}")]
    Validation(String),

    /// Not enough stock to satisfy a cart or purchase line
    #[error("Insufficient stock for product {code}: requested {requested}, available {available}")]
    InsufficientStock {
        code: String,
        requested: i64,
        available: i64,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
