//! Storage account identity and key material.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{CredentialError, StorageError, StorageResult};

const MIN_ACCOUNT_LEN: usize = 3;
const MAX_ACCOUNT_LEN: usize = 24;

/// Account name and shared key used to sign blob requests.
///
/// Construction never fails; invalid names or keys surface when a URL is
/// signed. The key is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageCredential {
    account_name: String,
    access_key: String,
}

impl StorageCredential {
    /// Create a credential from an account name and a base64 access key.
    pub fn new(account_name: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            access_key: access_key.into(),
        }
    }

    /// The storage account name.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Validate the account name and decode the access key.
    pub(crate) fn signing_key(&self) -> StorageResult<Vec<u8>> {
        validate_account_name(&self.account_name)?;

        let key = self.access_key.trim();
        if key.is_empty() {
            return Err(CredentialError::Missing.into());
        }
        let decoded = STANDARD.decode(key).map_err(CredentialError::Malformed)?;
        Ok(decoded)
    }
}

impl fmt::Debug for StorageCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredential")
            .field("account_name", &self.account_name)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Check a storage account name: 3-24 characters, lowercase letters and digits.
pub fn validate_account_name(name: &str) -> StorageResult<()> {
    let valid_len = (MIN_ACCOUNT_LEN..=MAX_ACCOUNT_LEN).contains(&name.len());
    let valid_chars = name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());

    if valid_len && valid_chars {
        Ok(())
    } else {
        Err(StorageError::InvalidAccount {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_account_names() {
        let longest = "a".repeat(24);
        for name in ["acct", "abc", "account123", longest.as_str()] {
            assert!(validate_account_name(name).is_ok(), "name={name}");
        }
    }

    #[test]
    fn test_invalid_account_names() {
        let too_long = "a".repeat(25);
        for name in ["", "ab", "Account", "my-account", "acct_1", "acct.x", too_long.as_str()] {
            let err = validate_account_name(name).unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidAccount { .. }),
                "name={name}"
            );
        }
    }

    #[test]
    fn test_signing_key_missing() {
        let err = StorageCredential::new("account", "  ").signing_key().unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidCredential(CredentialError::Missing)
        ));
    }

    #[test]
    fn test_signing_key_malformed() {
        let err = StorageCredential::new("account", "not base64!")
            .signing_key()
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidCredential(CredentialError::Malformed(_))
        ));
    }

    #[test]
    fn test_signing_key_checks_account_first() {
        let err = StorageCredential::new("", "").signing_key().unwrap_err();
        assert!(matches!(err, StorageError::InvalidAccount { .. }));
    }

    #[test]
    fn test_signing_key_decodes() {
        let key = StorageCredential::new("account", "Zm9vCg==")
            .signing_key()
            .unwrap();
        assert_eq!(key, b"foo\n");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", StorageCredential::new("account", "Zm9vCg=="));
        assert!(debug.contains("account"));
        assert!(!debug.contains("Zm9vCg=="));
    }
}
