use url::Url;

/// Environment variable holding the CDN base URL.
pub const BASE_ENV_VAR: &str = "CDN_IMAGE_HANDLER_URL";

/// Environment variable holding the storage bucket name.
pub const BUCKET_ENV_VAR: &str = "CDN_BUCKET";

/// Errors raised while loading a [`CdnConfig`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable `{0}`")]
    MissingVar(&'static str),

    /// The bucket name is empty.
    #[error("bucket name must not be empty")]
    EmptyBucket,

    /// The base is not an absolute URL.
    #[error("invalid CDN base URL `{base}`")]
    InvalidBase {
        /// The rejected value.
        base: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

/// CDN parameters shared by every URL built with a
/// [`CdnImage`](crate::CdnImage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnConfig {
    base: String,
    bucket: String,
    origin_bucket_url: String,
}

impl CdnConfig {
    /// Create a new [`CdnConfig`].
    ///
    /// The origin bucket URL is derived from `bucket`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sharp_cdn_image::CdnConfig;
    ///
    /// let config = CdnConfig::new("https://cdn.example.com", "my-files");
    /// assert_eq!(config.origin_bucket_url(), "https://my-files.s3.amazonaws.com");
    /// ```
    pub fn new(base: impl Into<String>, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let origin_bucket_url = format!("https://{bucket}.s3.amazonaws.com");

        Self {
            base: base.into(),
            bucket,
            origin_bucket_url,
        }
    }

    /// Load the configuration from [`BASE_ENV_VAR`] and [`BUCKET_ENV_VAR`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let base = lookup(BASE_ENV_VAR).ok_or(ConfigError::MissingVar(BASE_ENV_VAR))?;
        let bucket = lookup(BUCKET_ENV_VAR).ok_or(ConfigError::MissingVar(BUCKET_ENV_VAR))?;

        if let Err(source) = Url::parse(&base) {
            return Err(ConfigError::InvalidBase { base, source });
        }

        if bucket.trim().is_empty() {
            return Err(ConfigError::EmptyBucket);
        }

        tracing::debug!(%base, %bucket, "loaded CDN configuration");

        Ok(Self::new(base, bucket))
    }

    /// Public URL prefix of the CDN, as configured.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Default storage bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Direct URL of the storage bucket.
    pub fn origin_bucket_url(&self) -> &str {
        &self.origin_bucket_url
    }
}
