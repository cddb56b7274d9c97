//! Secret reference resolution
//!
//! Configuration values may reference environment-provided secrets instead of
//! embedding them: `${env:SMTP_PASSWORD}` resolves to the value of the
//! `SMTP_PASSWORD` environment variable. Values that are not references pass
//! through unchanged.

use fileferry_types::{Error, Result, SecretResolver};

const REFERENCE_PREFIX: &str = "${env:";
const REFERENCE_SUFFIX: &str = "}";

/// Check whether a configuration value is a secret reference
pub fn is_secret_reference(value: &str) -> bool {
    value.starts_with(REFERENCE_PREFIX) && value.ends_with(REFERENCE_SUFFIX)
}

/// Resolve a configuration value through the given resolver
///
/// Literal values are returned unchanged; references are resolved and fail if
/// the secret does not exist.
pub fn resolve_value(resolver: &dyn SecretResolver, value: &str) -> Result<String> {
    if is_secret_reference(value) {
        resolver.resolve(value)
    } else {
        Ok(value.to_string())
    }
}

/// Secret resolver backed by process environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretResolver;

impl EnvSecretResolver {
    /// Create a new environment-backed resolver
    pub fn new() -> Self {
        Self
    }

    fn variable_name(reference: &str) -> Option<&str> {
        let name = reference
            .strip_prefix(REFERENCE_PREFIX)?
            .strip_suffix(REFERENCE_SUFFIX)?;
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

impl SecretResolver for EnvSecretResolver {
    fn resolve(&self, reference: &str) -> Result<String> {
        let name = Self::variable_name(reference).ok_or_else(|| Error::SecretNotFound {
            reference: reference.to_string(),
        })?;

        std::env::var(name).map_err(|_| Error::SecretNotFound {
            reference: reference.to_string(),
        })
    }
}
