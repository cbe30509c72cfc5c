//! Storage URL resolution
//!
//! A [`SourceResolver`] maps a track filename to the public URL it is served
//! from. Resolution is deterministic and unauthenticated; the URL is never
//! stored on the track.

use url::Url;

/// Turns a storage object name into a public URL
pub trait SourceResolver {
    /// Public URL for `filename`, or `None` when remote playback is unavailable
    fn public_url(&self, filename: &str) -> Option<String>;
}

/// Supabase-style public object URLs:
/// `<base>/storage/v1/object/public/<bucket>/<filename>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrlResolver {
    base_url: String,
    bucket: String,
}

impl PublicUrlResolver {
    /// Bucket the site's music lives in
    pub const DEFAULT_BUCKET: &'static str = "v3xv0id-music";

    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl SourceResolver for PublicUrlResolver {
    fn public_url(&self, filename: &str) -> Option<String> {
        if filename.is_empty() || self.bucket.is_empty() {
            return None;
        }

        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["storage", "v1", "object", "public", &self.bucket, filename]);
        Some(url.into())
    }
}

/// Resolver for hosts without remote storage; every track plays locally
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnlyResolver;

impl SourceResolver for LocalOnlyResolver {
    fn public_url(&self, _filename: &str) -> Option<String> {
        None
    }
}

impl<T: SourceResolver + ?Sized> SourceResolver for Box<T> {
    fn public_url(&self, filename: &str) -> Option<String> {
        (**self).public_url(filename)
    }
}
