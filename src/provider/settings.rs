//! Provider settings: an opaque key/value bundle resolved once per
//! provider, owned exclusively by that provider's instance.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::InvokeError;

/// Opaque provider configuration, typically credentials and endpoints.
/// The core never interprets the values; operations read what they need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderSettings {
    values: BTreeMap<String, String>,
}

impl ProviderSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Credential accessor: the value wrapped so it stays out of logs.
    pub fn secret(&self, key: &str) -> Option<SecretString> {
        self.get(key).map(|value| SecretString::from(value.to_owned()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProviderSettings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Where a provider's settings come from. Resolution is lazy: nothing is
/// read until the provider's first invocation, and the outcome (success
/// or failure) is then cached for the process lifetime.
#[derive(Clone)]
pub enum SettingsSource {
    /// Settings supplied directly at registration time.
    Static(ProviderSettings),
    /// A flat JSON object of string values on disk, `settings.json`-style.
    File(PathBuf),
    /// A caller-supplied resolver; the error string is reported as the
    /// configuration failure message.
    Custom(Arc<dyn Fn() -> Result<ProviderSettings, String> + Send + Sync>),
}

impl SettingsSource {
    pub(crate) fn resolve(&self, provider: &str) -> Result<ProviderSettings, InvokeError> {
        let configuration_error = |message: String| InvokeError::ProviderConfiguration {
            provider: provider.to_string(),
            message,
        };
        match self {
            Self::Static(settings) => Ok(settings.clone()),
            Self::File(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| {
                    configuration_error(format!(
                        "cannot read settings file `{}`: {source}",
                        path.display()
                    ))
                })?;
                let values: BTreeMap<String, String> =
                    serde_json::from_str(&raw).map_err(|source| {
                        configuration_error(format!(
                            "settings file `{}` is not a flat JSON object of strings: {source}",
                            path.display()
                        ))
                    })?;
                Ok(ProviderSettings { values })
            }
            Self::Custom(resolve) => resolve().map_err(configuration_error),
        }
    }
}

impl fmt::Debug for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(settings) => f
                .debug_tuple("Static")
                .field(&format_args!("{} entries", settings.len()))
                .finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").finish(),
        }
    }
}

impl Default for SettingsSource {
    fn default() -> Self {
        Self::Static(ProviderSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn static_settings_resolve_to_a_copy() {
        let source =
            SettingsSource::Static(ProviderSettings::from_iter([("api_key", "k-123")]));
        let settings = source.resolve("acme").unwrap();
        assert_eq!(settings.get("api_key"), Some("k-123"));
    }

    #[test]
    fn secret_accessor_wraps_the_value() {
        let settings = ProviderSettings::from_iter([("api_key", "k-123")]);
        let secret = settings.secret("api_key").unwrap();
        assert_eq!(secret.expose_secret(), "k-123");
    }

    #[test]
    fn missing_settings_file_is_a_configuration_error() {
        let source = SettingsSource::File(PathBuf::from("/nonexistent/medley-settings.json"));
        let err = source.resolve("acme").unwrap_err();
        assert!(matches!(
            err,
            InvokeError::ProviderConfiguration { ref provider, .. } if provider == "acme"
        ));
    }

    #[test]
    fn custom_source_failure_carries_the_message() {
        let source = SettingsSource::Custom(Arc::new(|| Err("vault unreachable".to_string())));
        let err = source.resolve("acme").unwrap_err();
        assert!(matches!(
            err,
            InvokeError::ProviderConfiguration { ref message, .. } if message == "vault unreachable"
        ));
    }
}
