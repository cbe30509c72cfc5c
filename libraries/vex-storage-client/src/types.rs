//! Types for Storage API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vex_core::PublicUrlResolver;

/// Seconds a CDN may cache an uploaded object (one year).
pub const DEFAULT_CACHE_CONTROL_SECS: u64 = 31_536_000;

/// Page size used when listing a bucket.
pub const LIST_LIMIT: u32 = 1000;

/// Audio extensions picked up by directory uploads.
pub const UPLOADABLE_EXTENSIONS: [&str; 3] = ["mp3", "wav", "m4a"];

/// Configuration for connecting to a storage project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Project URL (e.g., "https://abc.supabase.co")
    pub url: String,
    /// API key sent as `apikey` and bearer token. Reads work without one on
    /// public buckets; uploads need a key with write access.
    pub api_key: Option<String>,
    /// Bucket holding the music files
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            bucket: PublicUrlResolver::DEFAULT_BUCKET.to_string(),
        }
    }
}

impl StorageConfig {
    /// Create a config for the default music bucket.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use another bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

// =============================================================================
// Listing Types
// =============================================================================

/// Request body for the object list endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub prefix: String,
    pub limit: u32,
    pub offset: u32,
    pub sort_by: SortBy,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            limit: LIST_LIMIT,
            offset: 0,
            sort_by: SortBy {
                column: "name".to_string(),
                order: "asc".to_string(),
            },
        }
    }
}

/// Sort order for listings.
#[derive(Debug, Serialize)]
pub struct SortBy {
    pub column: String,
    pub order: String,
}

/// An entry returned by the object list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageObject {
    pub name: String,
    /// `None` for folder placeholders
    pub id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub metadata: Option<ObjectMetadata>,
}

impl StorageObject {
    /// Whether this entry is a folder rather than a stored file.
    pub fn is_folder(&self) -> bool {
        self.id.is_none()
    }

    /// Object size in bytes, when reported.
    pub fn size(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.size)
    }
}

/// File metadata attached to a listed object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub size: Option<u64>,
    pub mimetype: Option<String>,
    pub cache_control: Option<String>,
}

// =============================================================================
// Upload Types
// =============================================================================

/// Per-upload options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// `max-age` sent as `cache-control`
    pub cache_control_secs: u64,
    /// Overwrite an existing object with the same name
    pub upsert: bool,
    /// Explicit content type; guessed from the extension when `None`
    pub content_type: Option<String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control_secs: DEFAULT_CACHE_CONTROL_SECS,
            upsert: true,
            content_type: None,
        }
    }
}

/// Response from a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// `<bucket>/<filename>`
    #[serde(rename = "Key")]
    pub key: String,
}

/// Progress information during a directory upload.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    pub file_index: usize,
    pub total_files: usize,
    pub current_file: String,
    pub bytes_total: u64,
}

/// Outcome of a directory upload.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Object keys that were stored
    pub uploaded: Vec<String>,
    /// `(filename, error message)` for each failure
    pub failed: Vec<(String, String)>,
    /// Total bytes sent for successful uploads
    pub bytes_uploaded: u64,
}

impl BatchSummary {
    /// Number of files attempted.
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }

    /// Whether every file was stored.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// =============================================================================
// Status Types
// =============================================================================

/// Upload state of one catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub filename: String,
    pub uploaded: bool,
}

/// Catalog files compared against the bucket contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadStatus {
    pub total: usize,
    pub uploaded: usize,
    pub remaining: usize,
    pub files: Vec<FileStatus>,
}

impl UploadStatus {
    /// Build the status of `expected` given the names present in the bucket.
    pub fn compute<'a>(expected: impl IntoIterator<Item = &'a str>, present: &[String]) -> Self {
        let files: Vec<FileStatus> = expected
            .into_iter()
            .map(|filename| FileStatus {
                filename: filename.to_string(),
                uploaded: present.iter().any(|name| name == filename),
            })
            .collect();

        let total = files.len();
        let uploaded = files.iter().filter(|f| f.uploaded).count();

        Self {
            total,
            uploaded,
            remaining: total - uploaded,
            files,
        }
    }

    /// Files not yet in the bucket.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter(|f| !f.uploaded)
            .map(|f| f.filename.as_str())
    }
}
