//! Hypermedia References
//!
//! Both remote services hand back URL-shaped references
//! (`https://host/customers/ABC123`) rather than bare ids, while the
//! request bodies we build need the bare id. References are reduced by
//! stripping a known path prefix.

use thiserror::Error;

/// Failure to reduce a reference to an id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HypermediaError {
    /// The reference does not contain the expected path prefix
    #[error("reference {href:?} does not contain {prefix:?}")]
    PrefixMismatch { href: String, prefix: String },

    /// The reference ends at the prefix with no id after it
    #[error("reference {href:?} carries no id after {prefix:?}")]
    EmptyId { href: String, prefix: String },
}

/// Extract the entity id that follows `prefix` in `href`.
///
/// `resource_id("https://host/customers/ABC123", "/customers/")` yields
/// `"ABC123"`. A reference without the prefix, or with nothing after it,
/// is an explicit error instead of a panic further down the flow.
pub fn resource_id<'a>(href: &'a str, prefix: &str) -> Result<&'a str, HypermediaError> {
    let start = href
        .find(prefix)
        .ok_or_else(|| HypermediaError::PrefixMismatch {
            href: href.to_string(),
            prefix: prefix.to_string(),
        })?;

    let id = &href[start + prefix.len()..];
    if id.is_empty() {
        return Err(HypermediaError::EmptyId {
            href: href.to_string(),
            prefix: prefix.to_string(),
        });
    }

    Ok(id)
}
