#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod account;
mod blob;
mod config;
mod error;
mod sas;

// ============================================================================
// Public API
// ============================================================================

// Credentials and blob coordinates
pub use account::{StorageCredential, validate_account_name};
pub use blob::{BlobRef, ROOT_CONTAINER};

// Configuration
pub use config::StorageClientConfig;

// Errors
pub use error::{CredentialError, StorageError, StorageResult};

// Signing
pub use sas::{SasUrlBuilder, SignedUrl, build_signed_url};
