//! Tenant Credentials & Audit Context
//!
//! The billing service is multi-tenant and audits every change. Both
//! concerns travel as explicit values so that no credential or audit
//! field lives in a module-level constant.

/// Multi-tenant credentials for the billing service
#[derive(Clone, Debug)]
pub struct TenantCredentials {
    /// RBAC username (HTTP basic auth)
    pub username: String,

    /// RBAC password (HTTP basic auth)
    pub password: String,

    /// Tenant api key
    pub api_key: String,

    /// Tenant api secret
    pub api_secret: String,
}

impl TenantCredentials {
    /// Read credentials from the environment, falling back to the demo
    /// tenant
    pub fn from_env() -> Self {
        Self {
            username: env_or("BILLING_USERNAME", "admin"),
            password: env_or("BILLING_PASSWORD", "password"),
            api_key: env_or("BILLING_API_KEY", "demo"),
            api_secret: env_or("BILLING_API_SECRET", "demo-secret"),
        }
    }
}

/// Audit metadata attached to every mutating billing call
#[derive(Clone, Debug)]
pub struct CallContext {
    /// Acting user recorded in the audit log
    pub created_by: String,

    /// Change reason
    pub reason: String,

    /// Free-form comment
    pub comment: String,
}

impl CallContext {
    /// Read audit fields from the environment, falling back to the demo
    /// values
    pub fn from_env() -> Self {
        Self {
            created_by: env_or("BILLING_CREATED_BY", "demo"),
            reason: env_or("BILLING_REASON", "New subscription"),
            comment: env_or("BILLING_COMMENT", "Triggered by checkout demo"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}
