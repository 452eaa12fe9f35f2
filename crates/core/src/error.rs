//! Validation errors raised by create operations and value parsing.

/// Error type for model validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A rejected input. Rejections never mutate state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was empty or whitespace-only
    #[error("{field} is required")]
    Required {
        /// Name of the missing field
        field: &'static str,
    },

    /// Amount text did not parse as a currency value
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// Invoice amounts must be greater than zero
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// Budgets may be zero but never negative
    #[error("budget must not be negative")]
    NegativeBudget,

    /// Calendar date was not `YYYY-MM-DD`
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Email address failed the shape check
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// A closed enumeration received a value it does not know
    #[error("unknown {field} '{value}'")]
    UnknownVariant {
        /// Which enumeration was being parsed
        field: &'static str,
        /// The rejected input
        value: String,
    },
}

impl ValidationError {
    pub(crate) fn unknown(field: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            field,
            value: value.to_string(),
        }
    }
}
