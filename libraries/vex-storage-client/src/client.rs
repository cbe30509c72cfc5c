//! Main storage client.

use crate::error::{Result, StorageClientError};
use crate::types::{ListRequest, StorageConfig, StorageObject, UploadStatus};
use crate::upload::UploadClient;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use vex_core::{Catalog, PublicUrlResolver, SourceResolver};

/// Client for the music bucket of a Supabase Storage project.
///
/// # Example
///
/// ```ignore
/// use vex_storage_client::{StorageClient, StorageConfig};
///
/// let config = StorageConfig::new("https://abc.supabase.co").with_api_key(key);
/// let client = StorageClient::new(config)?;
///
/// let status = client.upload_status(&vex_core::Catalog::builtin()).await;
/// println!("{} of {} uploaded", status.uploaded, status.total);
/// ```
pub struct StorageClient {
    http: Client,
    config: StorageConfig,
}

impl StorageClient {
    /// Create a new client with the given configuration.
    pub fn new(config: StorageConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(StorageClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StorageClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&url).map_err(|e| StorageClientError::InvalidUrl(e.to_string()))?;

        if config.bucket.is_empty() {
            return Err(StorageClientError::InvalidUrl(
                "bucket cannot be empty".into(),
            ));
        }

        // Uploads carry whole audio files, so the overall timeout is generous
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("V3XV0ID/{} (Console)", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: StorageConfig { url, ..config },
        })
    }

    /// Get the project URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    /// Resolver producing the same public URLs as [`Self::public_url`].
    pub fn resolver(&self) -> PublicUrlResolver {
        PublicUrlResolver::new(self.config.url.clone(), self.config.bucket.clone())
    }

    /// Public URL of an object in the bucket.
    pub fn public_url(&self, filename: &str) -> Result<String> {
        self.resolver().public_url(filename).ok_or_else(|| {
            StorageClientError::InvalidUrl(format!("cannot build a public URL for {filename:?}"))
        })
    }

    /// Access upload operations.
    pub fn upload(&self) -> UploadClient<'_> {
        UploadClient::new(self)
    }

    /// List the objects at the root of the bucket.
    pub async fn list_objects(&self) -> Result<Vec<StorageObject>> {
        let url = self.endpoint(&["list", &self.config.bucket])?;
        debug!(url = %url, "Listing bucket");

        let response = self
            .authorized(self.http.post(url))
            .json(&ListRequest::default())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageClientError::from_response(response).await);
        }

        let objects: Vec<StorageObject> = response.json().await.map_err(|e| {
            StorageClientError::ParseError(format!("Failed to parse object list: {e}"))
        })?;

        debug!(bucket = %self.config.bucket, objects = objects.len(), "Listed bucket");
        Ok(objects)
    }

    /// Names of the files stored in the bucket.
    ///
    /// Listing failures are logged and reported as an empty bucket.
    pub async fn uploaded_filenames(&self) -> Vec<String> {
        match self.list_objects().await {
            Ok(objects) => objects
                .into_iter()
                .filter(|object| !object.is_folder())
                .map(|object| object.name)
                .collect(),
            Err(e) => {
                warn!(bucket = %self.config.bucket, error = %e, "Error checking uploaded files");
                Vec::new()
            }
        }
    }

    /// Compare the catalog's filenames with the bucket contents.
    pub async fn upload_status(&self, catalog: &Catalog) -> UploadStatus {
        let present = self.uploaded_filenames().await;
        let status = UploadStatus::compute(catalog.filenames(), &present);

        info!(
            total = status.total,
            uploaded = status.uploaded,
            remaining = status.remaining,
            "Computed upload status"
        );

        status
    }

    /// `<url>/storage/v1/object/<segments...>` with each segment
    /// percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url =
            Url::parse(&self.config.url).map_err(|e| StorageClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| StorageClientError::InvalidUrl(self.config.url.clone()))?
            .pop_if_empty()
            .extend(["storage", "v1", "object"])
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => request.header("apikey", key).bearer_auth(key),
            _ => request,
        }
    }
}
