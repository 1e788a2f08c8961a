//! Error Types

use thiserror::Error;

use crate::hypermedia::HypermediaError;

/// Result type alias for payment network operations
pub type Result<T> = std::result::Result<T, PaymentNetworkError>;

/// Payment network errors
#[derive(Error, Debug)]
pub enum PaymentNetworkError {
    /// Transport-level failure talking to the network
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the network API
    #[error("Payment network API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A creation response carried no Location header
    #[error("missing Location header on {0}")]
    MissingLocation(&'static str),

    /// A hypermedia reference could not be reduced to an id
    #[error(transparent)]
    Hypermedia(#[from] HypermediaError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentNetworkError {
    /// User-facing message, safe to surface to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Api { .. } | Self::MissingLocation(_) => {
                "The payment network is currently unavailable. Please try again."
            }
            Self::Hypermedia(_) => "An unexpected reference was returned by the payment network.",
            Self::Config(_) => "Service configuration error.",
        }
    }
}
