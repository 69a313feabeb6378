//! Datei - the local filesystem as a virtual-filesystem provider
//!
//! This library lets a host application browse, read, and watch files on
//! disk through resource identifiers of the form `datei:/absolute/path`, the
//! same way it would address any other virtual resource.
//!
//! # Components
//!
//! - [`fs`]: async façade over native filesystem primitives with a single
//!   error channel ([`FsError`])
//! - [`provider`]: the [`FileSystemProvider`] contract and
//!   [`DateiFileSystemProvider`], which implements it for local disk,
//!   including change watching
//! - [`registry`]: host-side scheme to provider mapping
//!
//! The provider is read-only: create, write, delete and rename are part of
//! the contract but always fail with [`FsError::Unsupported`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use datei::{activate, ProviderConfig, ProviderRegistry, ResourceUri};
//! use tokio_util::sync::CancellationToken;
//!
//! let mut registry = ProviderRegistry::new();
//! let provider = activate(&mut registry, &ProviderConfig::default())?;
//!
//! let uri: ResourceUri = "datei:/etc".parse()?;
//! let fs = registry.provider_for(&uri).ok_or("no provider for scheme")?;
//! for entry in fs.read_directory(&uri, &CancellationToken::new()).await? {
//!     println!("{} {:?}", entry.name, entry.stat.kind);
//! }
//! ```

use std::sync::Arc;

use tracing::info;

pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod provider;
pub mod registry;
pub mod stat;
pub mod uri;

pub use error::{FsError, FsResult, Operation};
pub use provider::{
    ChangeKind, DateiFileSystemProvider, DeleteOptions, FileChangeEvent, FileSystemProvider,
    ProviderConfig, RenameOptions, SubscriptionState, WatchHandle, WatchOptions,
    WriteFileOptions,
};
pub use registry::{ProviderOptions, ProviderRegistry, RegistryError};
pub use stat::{DirEntry, FileKind, FileStat};
pub use uri::{ResourceUri, UriError, SCHEME};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the local provider and register it with the host.
///
/// The provider is registered case-insensitive unless `config` says
/// otherwise, and is returned so the caller can watch and subscribe.
///
/// # Errors
///
/// Fails if the configured scheme is malformed or already registered.
pub fn activate(
    registry: &mut ProviderRegistry,
    config: &ProviderConfig,
) -> Result<Arc<DateiFileSystemProvider>, RegistryError> {
    let provider = Arc::new(DateiFileSystemProvider::with_config(config.clone()));
    registry.register(
        provider.scheme(),
        Arc::clone(&provider) as Arc<dyn FileSystemProvider>,
        ProviderOptions {
            is_case_sensitive: config.case_sensitive,
            is_readonly: false,
        },
    )?;

    info!(scheme = provider.scheme(), version = VERSION, "Datei provider is active");
    Ok(provider)
}
