//! Billing Error Types

use thiserror::Error;

/// Result type alias for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;

/// Billing service errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// Transport-level failure talking to the billing service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the billing API
    #[error("Billing API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The billing backend reported transient lock contention on the
    /// account record. Callers decide whether to tolerate this class.
    #[error("account record locked: {0}")]
    AccountLocked(String),

    /// A creation response carried no Location header
    #[error("missing Location header on {0}")]
    MissingLocation(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BillingError {
    /// Classify an API failure, separating transient account-record lock
    /// contention from everything else.
    pub fn from_api_response(status: u16, message: String) -> Self {
        if message.to_lowercase().contains("lock") {
            Self::AccountLocked(message)
        } else {
            Self::Api { status, message }
        }
    }

    /// Whether this failure is the tolerated lock-contention class
    pub fn is_lock_contention(&self) -> bool {
        matches!(self, Self::AccountLocked(_))
    }

    /// User-facing message, safe to surface to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Api { .. } | Self::MissingLocation(_) => {
                "The billing service is currently unavailable. Please try again."
            }
            Self::AccountLocked(_) => "The billing account is busy. Please retry shortly.",
            Self::Config(_) => "Service configuration error.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_messages_are_classified() {
        let err = BillingError::from_api_response(500, "Failed to lock account record".into());
        assert!(err.is_lock_contention());
    }

    #[test]
    fn other_api_failures_stay_generic() {
        let err = BillingError::from_api_response(400, "currency is required".into());
        assert!(!err.is_lock_contention());
        assert!(matches!(err, BillingError::Api { status: 400, .. }));
    }
}
