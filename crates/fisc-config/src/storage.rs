//! Object-storage configuration for computation-tree records.

use serde::{Deserialize, Serialize};

fn default_bucket() -> String {
    String::from("fisc-computation-trees")
}

fn default_prefix() -> String {
    String::from("trees")
}

fn default_region() -> String {
    String::from("auto")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket holding tree records.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Key prefix within the bucket.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// S3-compatible endpoint URL. Empty means the provider default.
    #[serde(default)]
    pub endpoint: String,

    /// Region passed to the S3 client.
    #[serde(default = "default_region")]
    pub region: String,

    /// Access key id.
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key.
    #[serde(default)]
    pub secret_access_key: String,

    /// Local directory backend for development. When set (and S3 is not
    /// configured), records are stored as files under this directory.
    #[serde(default)]
    pub local_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            prefix: default_prefix(),
            endpoint: String::new(),
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            local_dir: String::new(),
        }
    }
}

impl StorageConfig {
    /// Whether the S3 backend has the minimum required fields.
    #[must_use]
    pub fn is_s3_configured(&self) -> bool {
        !self.bucket.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
    }
}
