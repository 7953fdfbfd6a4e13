//! Blob coordinates.

/// Reserved name of an account's root container.
pub const ROOT_CONTAINER: &str = "$root";

/// Identifies one blob in cloud storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobRef {
    /// Storage DNS suffix, e.g. `core.windows.net`.
    pub storage_base: String,
    /// Container name; empty means the root container.
    pub container: String,
    /// Blob name, may contain `/` separated virtual directories.
    pub blob_name: String,
}

impl BlobRef {
    pub fn new(
        storage_base: impl Into<String>,
        container: impl Into<String>,
        blob_name: impl Into<String>,
    ) -> Self {
        Self {
            storage_base: storage_base.into(),
            container: container.into(),
            blob_name: blob_name.into(),
        }
    }

    /// Container path segment, substituting the root container marker.
    pub fn container_segment(&self) -> &str {
        if self.container.is_empty() {
            ROOT_CONTAINER
        } else {
            &self.container
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_segment() {
        assert_eq!(BlobRef::new("b", "", "x").container_segment(), "$root");
        assert_eq!(BlobRef::new("b", "c", "x").container_segment(), "c");
    }
}
