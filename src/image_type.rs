//! Image types as constants which can be used to establish a slice of supported
//! image types and negotiate an output format with a client.
use headers_accept::Accept;
use http::{header, HeaderMap};
use mediatype::{names, MediaType};
use serde::Serialize;

const IMAGE_WEBP: MediaType = image_type(names::WEBP);
const IMAGE_AVIF: MediaType = image_type(names::AVIF);
const IMAGE_PNG: MediaType = image_type(names::PNG);
const IMAGE_JPEG: MediaType = image_type(names::JPEG);

const fn image_type(subtype: mediatype::Name) -> MediaType {
    MediaType::new(names::IMAGE, subtype)
}

/// Output format understood by the image handler's `toFormat` edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// WebP.
    Webp,
    /// AVIF.
    Avif,
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
}

impl OutputFormat {
    /// Name of the format as the image handler expects it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Avif => "avif",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WebP image type.
pub const WEBP: SupportedImageType = SupportedImageType::new(IMAGE_WEBP, OutputFormat::Webp);
/// AVIF image type.
pub const AVIF: SupportedImageType = SupportedImageType::new(IMAGE_AVIF, OutputFormat::Avif);
/// PNG image type.
pub const PNG: SupportedImageType = SupportedImageType::new(IMAGE_PNG, OutputFormat::Png);
/// JPEG image type.
pub const JPEG: SupportedImageType = SupportedImageType::new(IMAGE_JPEG, OutputFormat::Jpeg);

/// Alias for a static slice of [`SupportedImageType`].
pub type SupportedImageTypes = &'static [SupportedImageType<'static>];

/// Default of supported image types, consisting of [`WEBP`] and [`PNG`].
pub const DEFAULT_SUPPORTED_IMAGE_TYPES: SupportedImageTypes = &[WEBP, PNG];

// WebP is only requested when the client prefers it over a JPEG fallback.
const WEBP_CANDIDATES: SupportedImageTypes = &[WEBP, JPEG];

/// Pair of [`MediaType`] and [`OutputFormat`].
#[derive(Debug)]
pub struct SupportedImageType<'a> {
    /// Media type, such as "image/png".
    pub media_type: MediaType<'a>,

    /// Output format, such as `png`.
    pub output_format: OutputFormat,
}

impl<'a> SupportedImageType<'a> {
    const fn new(media_type: MediaType<'a>, output_format: OutputFormat) -> Self {
        Self {
            media_type,
            output_format,
        }
    }
}

impl<'a> From<&'a SupportedImageType<'a>> for &'a MediaType<'a> {
    fn from(value: &'a SupportedImageType<'a>) -> Self {
        &value.media_type
    }
}

/// Negotiate the output format preferred by `accept` among `supported_image_types`.
pub fn negotiate_format<'a>(
    accept: &Accept,
    supported_image_types: &'a [SupportedImageType<'a>],
) -> Option<OutputFormat> {
    let supported_media_types = supported_image_types.iter().map(Into::into);
    let negotiated = accept.negotiate(supported_media_types)?;

    supported_image_types
        .iter()
        .find(|supported| supported.media_type == *negotiated)
        .map(|supported| supported.output_format)
}

/// Whether the `Accept` header in `headers` negotiates to WebP.
///
/// A missing or invalid header counts as no WebP support.
pub fn accepts_webp(headers: &HeaderMap) -> bool {
    let accept_header = headers.get(header::ACCEPT);
    let Some::<Accept>(accept) = accept_header.and_then(|v| v.try_into().ok()) else {
        tracing::debug!(header_value = ?accept_header, "missing or invalid accept header");
        return false;
    };

    negotiate_format(&accept, WEBP_CANDIDATES) == Some(OutputFormat::Webp)
}
