use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::{
    config::CdnConfig,
    image_request::{object_key, ImageRequest},
};

/// Predicate deciding whether a URI is served from the CDN.
///
/// Called with the URI, the configured base and the origin bucket URL.
pub type ServedFromCdn = Arc<dyn Fn(&str, &str, &str) -> bool + Send + Sync>;

fn default_served_from_cdn(uri: &str, base: &str, origin_bucket_url: &str) -> bool {
    uri.starts_with(base) || uri.starts_with(origin_bucket_url)
}

/// Per-call options of [`CdnImage::build_url_with`].
#[derive(Debug, Clone, Default)]
pub struct UrlOptions {
    bucket: Option<String>,
}

impl UrlOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the configured bucket for this call.
    ///
    /// An empty name leaves the configured bucket in place.
    pub fn bucket(self, bucket: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
        }
    }
}

/// Builder of CDN image URLs.
///
/// Holds no mutable state; clone it or share it across threads freely.
///
/// # Example
///
/// ```rust
/// use sharp_cdn_image::{CdnConfig, CdnImage, Edits};
///
/// let cdn = CdnImage::new(CdnConfig::new("https://cdn.example.com", "my-files"));
///
/// // Images served from the CDN get edits applied.
/// let url = cdn.build_url("https://cdn.example.com/pic.jpg", &Edits::new().resize(150, 100));
/// assert!(url.starts_with("https://cdn.example.com/eyJ"));
///
/// // Anything else is returned as-is.
/// let foreign = "https://www.rustacean.net/assets/rustacean-orig-noshadow.png";
/// assert_eq!(cdn.build_url(foreign, &Edits::new().resize(150, 100)), foreign);
/// ```
#[derive(Clone)]
pub struct CdnImage {
    config: CdnConfig,
    served_from_cdn: ServedFromCdn,
}

impl std::fmt::Debug for CdnImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnImage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CdnImage {
    /// Create a new [`CdnImage`] with the default CDN membership test.
    pub fn new(config: CdnConfig) -> Self {
        CdnImageBuilder::new(config).build()
    }

    /// Configuration in use.
    pub fn config(&self) -> &CdnConfig {
        &self.config
    }

    /// Whether `uri` is served from the CDN.
    pub fn is_served_from_cdn(&self, uri: &str) -> bool {
        (self.served_from_cdn)(uri, self.config.base(), self.config.origin_bucket_url())
    }

    /// Build the URL of `uri` with `edits` applied, using the configured bucket.
    ///
    /// See [`CdnImage::build_url_with`].
    pub fn build_url<E>(&self, uri: &str, edits: &E) -> String
    where
        E: Serialize + ?Sized,
    {
        self.build_url_with(uri, edits, &UrlOptions::default())
    }

    /// Build the URL of `uri` with `edits` applied.
    ///
    /// `uri` is either an absolute URL or an object key; anything that does
    /// not parse as an absolute URL is used as the key. Absolute URLs which
    /// are not served from the CDN are returned unchanged, as is `uri` whenever
    /// the request cannot be built. This never fails.
    #[instrument(level = "trace", skip_all, fields(uri = %uri))]
    pub fn build_url_with<E>(&self, uri: &str, edits: &E, options: &UrlOptions) -> String
    where
        E: Serialize + ?Sized,
    {
        let path = match Url::parse(uri) {
            Ok(url) => {
                if !self.is_served_from_cdn(uri) {
                    tracing::debug!("not served from CDN, edits ignored");
                    return uri.to_owned();
                }
                url.path().to_owned()
            }

            // Not a valid absolute URL: treat as an object key.
            Err(err) => {
                tracing::trace!(err = %err, "not an absolute URL, using it as object key");
                uri.to_owned()
            }
        };

        let Some(key) = object_key(&path) else {
            tracing::warn!(path = %path, "could not decode object key");
            return uri.to_owned();
        };

        let bucket = options
            .bucket
            .as_deref()
            .filter(|bucket| !bucket.is_empty())
            .unwrap_or(self.config.bucket());

        let request = ImageRequest {
            bucket,
            key: &key,
            edits,
        };

        match request.encode() {
            Ok(encoded) => {
                let base = self.config.base();
                let base = base.strip_suffix('/').unwrap_or(base);
                format!("{base}/{encoded}")
            }

            Err(err) => {
                tracing::warn!(err = %err, "failed to serialize image request");
                uri.to_owned()
            }
        }
    }
}

/// Builder for [`CdnImage`].
pub struct CdnImageBuilder {
    config: CdnConfig,
    served_from_cdn: ServedFromCdn,
}

impl std::fmt::Debug for CdnImageBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdnImageBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CdnImageBuilder {
    /// Create a new [`CdnImageBuilder`] with the provided [`CdnConfig`].
    pub fn new(config: CdnConfig) -> Self {
        Self {
            config,
            served_from_cdn: Arc::new(default_served_from_cdn),
        }
    }

    /// Configure the CDN membership test.
    ///
    /// By default a URI is served from the CDN when it starts with the base
    /// or the origin bucket URL.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharp_cdn_image::{CdnConfig, CdnImageBuilder};
    ///
    /// let cdn = CdnImageBuilder::new(CdnConfig::new("https://cdn.example.com", "my-files"))
    ///     .set_served_from_cdn(|uri, _base, _bucket_url| uri.contains("/uploads/"))
    ///     .build();
    ///
    /// assert!(cdn.is_served_from_cdn("https://static.example.com/uploads/pic.jpg"));
    /// ```
    pub fn set_served_from_cdn<F>(self, served_from_cdn: F) -> Self
    where
        F: Fn(&str, &str, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            served_from_cdn: Arc::new(served_from_cdn),
            ..self
        }
    }

    /// Build the [`CdnImage`].
    pub fn build(self) -> CdnImage {
        CdnImage {
            config: self.config,
            served_from_cdn: self.served_from_cdn,
        }
    }
}
