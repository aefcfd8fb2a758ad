//! Reference resolution against the page base URL.
//!
//! # Responsibilities
//! - Turn absolute, protocol-relative and relative references into absolute URLs
//! - Never fail: unresolvable references come back untouched

use url::Url;

/// Scheme used for protocol-relative references when the base has no web scheme.
const FALLBACK_SCHEME: &str = "https";

/// Resolve `reference` against `base`.
///
/// Returns the reference unchanged when it cannot be resolved.
pub fn resolve(base: &Url, reference: &str) -> String {
    if let Some(rest) = reference.strip_prefix("//") {
        let scheme = match base.scheme() {
            "http" | "https" => base.scheme(),
            _ => FALLBACK_SCHEME,
        };
        return match Url::parse(&format!("{}://{}", scheme, rest)) {
            Ok(url) => url.to_string(),
            Err(_) => reference.to_string(),
        };
    }

    match base.join(reference) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::trace!(reference = %reference, error = %e, "Leaving unresolvable reference as-is");
            reference.to_string()
        }
    }
}
