//! Host-side registry of filesystem providers by scheme.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::provider::FileSystemProvider;
use crate::uri::{validate_scheme, ResourceUri};

/// Flags a provider declares when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Whether paths under this scheme differ by case.
    pub is_case_sensitive: bool,
    /// Whether the host should treat the whole scheme as read-only.
    pub is_readonly: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            is_case_sensitive: true,
            is_readonly: false,
        }
    }
}

/// Errors from provider registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("A provider is already registered for scheme '{0}'")]
    AlreadyRegistered(String),

    #[error("Invalid scheme '{0}'")]
    InvalidScheme(String),
}

struct Registration {
    provider: Arc<dyn FileSystemProvider>,
    options: ProviderOptions,
}

/// Maps schemes to the providers that serve them.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Registration>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` for `scheme`.
    ///
    /// # Errors
    ///
    /// Fails if the scheme is malformed or already taken.
    pub fn register(
        &mut self,
        scheme: &str,
        provider: Arc<dyn FileSystemProvider>,
        options: ProviderOptions,
    ) -> Result<(), RegistryError> {
        validate_scheme(scheme).map_err(|_| RegistryError::InvalidScheme(scheme.to_string()))?;
        if self.providers.contains_key(scheme) {
            return Err(RegistryError::AlreadyRegistered(scheme.to_string()));
        }

        debug!(
            scheme,
            case_sensitive = options.is_case_sensitive,
            readonly = options.is_readonly,
            "Registered filesystem provider"
        );
        self.providers
            .insert(scheme.to_string(), Registration { provider, options });
        Ok(())
    }

    /// Remove the provider for `scheme`, returning it if present.
    pub fn unregister(&mut self, scheme: &str) -> Option<Arc<dyn FileSystemProvider>> {
        self.providers.remove(scheme).map(|r| r.provider)
    }

    /// The provider serving `uri`'s scheme.
    pub fn provider_for(&self, uri: &ResourceUri) -> Option<Arc<dyn FileSystemProvider>> {
        self.providers
            .get(uri.scheme())
            .map(|r| Arc::clone(&r.provider))
    }

    /// Options declared for `scheme`.
    pub fn options(&self, scheme: &str) -> Option<ProviderOptions> {
        self.providers.get(scheme).map(|r| r.options)
    }

    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Whether two identifiers address the same resource.
    ///
    /// Paths are compared ignoring case when the scheme's provider was
    /// registered case-insensitive. Unregistered schemes compare exactly.
    pub fn is_same_resource(&self, a: &ResourceUri, b: &ResourceUri) -> bool {
        if a.scheme() != b.scheme() {
            return false;
        }
        let case_sensitive = self
            .options(a.scheme())
            .map_or(true, |o| o.is_case_sensitive);
        if case_sensitive {
            a.path() == b.path()
        } else {
            let left = a.path().to_string_lossy();
            let right = b.path().to_string_lossy();
            left.to_lowercase() == right.to_lowercase()
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("schemes", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::provider::DateiFileSystemProvider;

    fn provider() -> Arc<dyn FileSystemProvider> {
        Arc::new(DateiFileSystemProvider::new())
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ProviderRegistry::new();
        registry
            .register("datei", provider(), ProviderOptions::default())
            .unwrap();

        let uri = ResourceUri::parse("datei:/tmp").unwrap();
        assert!(registry.provider_for(&uri).is_some());

        let other = ResourceUri::parse("file:/tmp").unwrap();
        assert!(registry.provider_for(&other).is_none());
    }

    #[test]
    fn test_duplicate_scheme_rejected() {
        let mut registry = ProviderRegistry::new();
        registry
            .register("datei", provider(), ProviderOptions::default())
            .unwrap();
        let err = registry
            .register("datei", provider(), ProviderOptions::default())
            .unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("datei".to_string()));
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        let mut registry = ProviderRegistry::new();
        let err = registry
            .register("", provider(), ProviderOptions::default())
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidScheme(_)));
    }

    #[test]
    fn test_unregister() {
        let mut registry = ProviderRegistry::new();
        registry
            .register("datei", provider(), ProviderOptions::default())
            .unwrap();
        assert!(registry.unregister("datei").is_some());
        assert!(registry.unregister("datei").is_none());
        assert_eq!(registry.schemes().count(), 0);
    }

    #[test]
    fn test_same_resource_respects_case_flag() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(
                "datei",
                provider(),
                ProviderOptions {
                    is_case_sensitive: false,
                    is_readonly: false,
                },
            )
            .unwrap();
        registry
            .register("strict", provider(), ProviderOptions::default())
            .unwrap();

        let a = ResourceUri::parse("datei:/Home/Notes.md").unwrap();
        let b = ResourceUri::parse("datei:/home/notes.md").unwrap();
        assert!(registry.is_same_resource(&a, &b));

        let c = ResourceUri::parse("strict:/Home/Notes.md").unwrap();
        let d = ResourceUri::parse("strict:/home/notes.md").unwrap();
        assert!(!registry.is_same_resource(&c, &d));

        assert!(!registry.is_same_resource(&a, &c));
    }
}
