//! V3XV0ID Storage Client
//!
//! HTTP client for the music bucket on Supabase Storage.
//!
//! # Features
//!
//! - **Public URLs**: the same URLs the player streams from
//! - **Listing**: bucket contents and catalog upload status
//! - **Upload**: single objects or whole directories with progress reporting
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use vex_storage_client::{StorageClient, StorageConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StorageConfig::new("https://abc.supabase.co").with_api_key("service-key");
//!     let client = StorageClient::new(config)?;
//!
//!     let summary = client
//!         .upload()
//!         .upload_directory("public/music".as_ref(), Duration::from_millis(100), |p| {
//!             println!("[{}/{}] {}", p.file_index + 1, p.total_files, p.current_file);
//!         })
//!         .await?;
//!     println!("{} uploaded, {} failed", summary.uploaded.len(), summary.failed.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;
mod upload;

pub use client::StorageClient;
pub use error::{Result, StorageClientError};
pub use types::{
    BatchSummary, FileStatus, ObjectMetadata, StorageConfig, StorageObject, UploadOptions,
    UploadProgress, UploadResponse, UploadStatus, DEFAULT_CACHE_CONTROL_SECS, LIST_LIMIT,
    UPLOADABLE_EXTENSIONS,
};
pub use upload::UploadClient;
