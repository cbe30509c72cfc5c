//! Object upload operations.

use crate::client::StorageClient;
use crate::error::{Result, StorageClientError};
use crate::types::{BatchSummary, UploadOptions, UploadProgress, UploadResponse, UPLOADABLE_EXTENSIONS};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upload client for the music bucket.
pub struct UploadClient<'a> {
    client: &'a StorageClient,
}

impl<'a> UploadClient<'a> {
    pub(crate) fn new(client: &'a StorageClient) -> Self {
        Self { client }
    }

    /// Store `bytes` as `filename` in the bucket.
    pub async fn upload_bytes(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<UploadResponse> {
        if filename.is_empty() {
            return Err(StorageClientError::InvalidUrl(
                "object name cannot be empty".into(),
            ));
        }

        let url = self.client.endpoint(&[self.client.bucket(), filename])?;
        let content_type = options
            .content_type
            .clone()
            .unwrap_or_else(|| mime_type_for_file(Path::new(filename)).to_string());
        let size = bytes.len();

        debug!(url = %url, size, content_type = %content_type, "Uploading object");

        let response = self
            .client
            .authorized(self.client.http().post(url))
            .header("content-type", content_type)
            .header("cache-control", format!("max-age={}", options.cache_control_secs))
            .header("x-upsert", options.upsert.to_string())
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageClientError::from_response(response).await);
        }

        let upload: UploadResponse = response.json().await.map_err(|e| {
            StorageClientError::ParseError(format!("Failed to parse upload response: {e}"))
        })?;

        info!(key = %upload.key, size, "Object uploaded");
        Ok(upload)
    }

    /// Upload a file under its own file name.
    pub async fn upload_file(&self, file_path: &Path) -> Result<UploadResponse> {
        if !file_path.is_file() {
            return Err(StorageClientError::FileNotFound(
                file_path.display().to_string(),
            ));
        }

        let filename = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageClientError::FileNotFound(file_path.display().to_string()))?;

        let contents = tokio::fs::read(file_path).await?;
        self.upload_bytes(filename, contents, &UploadOptions::default())
            .await
    }

    /// Upload every audio file in `dir`, pausing `delay` between files.
    ///
    /// Failures are collected in the summary; the batch keeps going.
    pub async fn upload_directory<F>(
        &self,
        dir: &Path,
        delay: Duration,
        mut progress_callback: F,
    ) -> Result<BatchSummary>
    where
        F: FnMut(UploadProgress),
    {
        let files = audio_files_in(dir).await?;
        let total_files = files.len();
        let mut summary = BatchSummary::default();

        info!(dir = %dir.display(), files = total_files, "Uploading directory");

        for (index, file_path) in files.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let file_name = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            let bytes_total = file_path.metadata().map(|m| m.len()).unwrap_or(0);

            progress_callback(UploadProgress {
                file_index: index,
                total_files,
                current_file: file_name.clone(),
                bytes_total,
            });

            match self.upload_file(file_path).await {
                Ok(response) => {
                    summary.uploaded.push(response.key);
                    summary.bytes_uploaded += bytes_total;
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Upload failed");
                    summary.failed.push((file_name, e.to_string()));
                }
            }
        }

        info!(
            uploaded = summary.uploaded.len(),
            failed = summary.failed.len(),
            bytes = summary.bytes_uploaded,
            "Directory upload finished"
        );

        Ok(summary)
    }
}

/// Audio files directly inside `dir`, sorted by name.
async fn audio_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StorageClientError::DirectoryNotFound(
            dir.display().to_string(),
        ));
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_uploadable(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_uploadable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            UPLOADABLE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Get MIME type for audio file.
fn mime_type_for_file(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a" | "aac") => "audio/mp4",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}
