//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, recoverable business failures. None of
/// these are fatal to the process; the calling boundary decides how each maps
/// onto its transport (HTTP status codes, RPC codes, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input (negative price, unknown customer role, duplicate SKU).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is illegal for the entity's current status.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The caller lacks ownership of the resource for this action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Fulfillment blocked by inventory.
    #[error("Insufficient stock for product {product}. Available: {available}, Required: {required}")]
    InsufficientStock {
        product: String,
        available: i64,
        required: i64,
    },

    /// The persistent store did not answer within the deadline.
    #[error("store timeout: {0}")]
    Timeout(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn insufficient_stock(product: impl Into<String>, available: i64, required: i64) -> Self {
        Self::InsufficientStock {
            product: product.into(),
            available,
            required,
        }
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_names_product_and_quantities() {
        let err = DomainError::insufficient_stock("Rosa Roja Premium", 40, 60);
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product Rosa Roja Premium. Available: 40, Required: 60"
        );
    }

    #[test]
    fn helper_constructors_build_matching_variants() {
        assert!(matches!(
            DomainError::invalid_argument("bad"),
            DomainError::InvalidArgument(_)
        ));
        assert!(matches!(
            DomainError::invalid_state("wrong status"),
            DomainError::InvalidState(_)
        ));
        assert!(matches!(
            DomainError::timeout("write lock"),
            DomainError::Timeout(_)
        ));
    }
}
