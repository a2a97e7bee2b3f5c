//! # Overview
//!
//! This crate builds image URLs for a CDN fronted by a sharp-based image
//! handler. An image request, naming the storage bucket, the object key and
//! the edits to apply, is serialized to JSON, Base64 encoded and appended to
//! the CDN base URL:
//!
//! ```text
//! {base}/{base64({"bucket":"...","key":"...","edits":{...}})}
//! ```
//!
//! Building a URL never fails: URLs which are not served from the CDN, and
//! any input the request cannot be built from, are returned unchanged.
//!
//! # Usage
//!
//! ```rust
//! use http::{header, HeaderMap, HeaderValue};
//! use sharp_cdn_image::{
//!     image_type::{accepts_webp, OutputFormat},
//!     CdnConfig, CdnImage, Edits, ImageVariantsBuilder, UrlOptions,
//! };
//!
//! let cdn = CdnImage::new(CdnConfig::new("https://cdn.example.com/", "my-files"));
//!
//! // Object keys and CDN URLs are both accepted.
//! let edits = Edits::new().resize(150, 100).to_format(OutputFormat::Webp);
//! let url = cdn.build_url("uploads/rustacean.png", &edits);
//! assert!(url.starts_with("https://cdn.example.com/"));
//!
//! // The bucket may be overridden per call.
//! let other = cdn.build_url_with("rustacean.png", &edits, &UrlOptions::new().bucket("archive"));
//! assert_ne!(url, other);
//!
//! // Presentation sizes, with WebP negotiated from the request.
//! let mut headers = HeaderMap::new();
//! headers.insert(header::ACCEPT, HeaderValue::from_static("image/webp,*/*;q=0.8"));
//! let variants = ImageVariantsBuilder::new(cdn)
//!     .set_accept_webp(accepts_webp(&headers))
//!     .build();
//! let avatar = variants.avatar_url("https://cdn.example.com/avatar.png", 2.0);
//! assert!(avatar.starts_with("https://cdn.example.com/"));
//! ```
#![warn(
    clippy::all,
    nonstandard_style,
    future_incompatible,
    missing_docs,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

mod cdn_image;
mod config;
mod edits;
pub mod gallery;
mod image_request;
pub mod image_type;
mod variants;

pub use cdn_image::{CdnImage, CdnImageBuilder, ServedFromCdn, UrlOptions};
pub use config::{CdnConfig, ConfigError, BASE_ENV_VAR, BUCKET_ENV_VAR};
pub use edits::{Edits, Height, Width};
pub use image_type::{OutputFormat, SupportedImageTypes, DEFAULT_SUPPORTED_IMAGE_TYPES};
pub use variants::{ImageAccessor, ImagePresets, ImageVariants, ImageVariantsBuilder};
