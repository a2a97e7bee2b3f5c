use serde_json::Value;

use crate::{
    edits::{Edits, Height, Width},
    image_type::OutputFormat,
    CdnImage,
};

const DEFAULT_AVATAR_WIDTH: Width = 96;
const DEFAULT_BASE_WIDTH: Width = 600;
const DEFAULT_BASE_RATIO: f64 = 1.5;

// Marks URLs already carrying edits of a legacy image service.
const LEGACY_FILTERS_MARKER: &str = "filters:";

/// Where to find an image URI within a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAccessor {
    /// `metadata.images[index].url`.
    Index(usize),
    /// A JSON pointer, such as `/metadata/cover/url`.
    Pointer(String),
}

impl Default for ImageAccessor {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl ImageAccessor {
    /// Image URI of `resource`, or an empty string.
    pub fn image_uri<'a>(&self, resource: &'a Value) -> &'a str {
        let found = match self {
            Self::Index(index) => resource.pointer(&format!("/metadata/images/{index}/url")),
            Self::Pointer(pointer) => resource.pointer(pointer),
        };

        found.and_then(Value::as_str).unwrap_or_default()
    }
}

/// Sizes used to present images.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePresets {
    /// Avatar width at resolution 1.
    pub avatar_width: Width,
    /// Width of regular images.
    pub base_width: Width,
    /// Width over height of regular and large images.
    pub base_ratio: f64,
    /// Placeholder image service, such as `https://picsum.photos`.
    pub placeholder_base_url: Option<String>,
    /// Show placeholders in place of images not served from the CDN.
    pub debug_placeholders: bool,
}

impl Default for ImagePresets {
    fn default() -> Self {
        Self {
            avatar_width: DEFAULT_AVATAR_WIDTH,
            base_width: DEFAULT_BASE_WIDTH,
            base_ratio: DEFAULT_BASE_RATIO,
            placeholder_base_url: None,
            debug_placeholders: false,
        }
    }
}

impl ImagePresets {
    /// Height of regular images.
    pub fn base_height(&self) -> Height {
        height_for(self.base_width, self.base_ratio)
    }

    /// Width of large images, twice the regular width.
    pub fn large_width(&self) -> Width {
        self.base_width.saturating_mul(2)
    }

    /// Height of large images.
    pub fn large_height(&self) -> Height {
        height_for(self.large_width(), self.base_ratio)
    }
}

fn height_for(width: Width, ratio: f64) -> Height {
    if !ratio.is_finite() || ratio <= 0.0 {
        return width;
    }

    // Saturating float-to-int conversion.
    (f64::from(width) / ratio).round() as Height
}

/// Image URLs in the sizes the presentation layer needs.
///
/// # Example
///
/// ```rust
/// use sharp_cdn_image::{CdnConfig, CdnImage, ImageVariantsBuilder};
///
/// let cdn = CdnImage::new(CdnConfig::new("https://cdn.example.com", "my-files"));
/// let variants = ImageVariantsBuilder::new(cdn).set_accept_webp(true).build();
///
/// let avatar = variants.avatar_url("https://cdn.example.com/avatar.png", 2.0);
/// assert!(avatar.starts_with("https://cdn.example.com/"));
/// ```
#[derive(Debug, Clone)]
pub struct ImageVariants {
    cdn: CdnImage,
    presets: ImagePresets,
    accept_webp: bool,
}

impl ImageVariants {
    /// Presets in use.
    pub fn presets(&self) -> &ImagePresets {
        &self.presets
    }

    /// Whether WebP conversion is requested.
    pub fn accept_webp(&self) -> bool {
        self.accept_webp
    }

    fn sized_edits(&self, width: Width, height: Height) -> Edits {
        let edits = Edits::new().resize(width, height);
        if self.accept_webp {
            edits.to_format(OutputFormat::Webp)
        } else {
            edits
        }
    }

    fn sized_url(&self, uri: &str, width: Width, height: Height) -> String {
        if self.cdn.is_served_from_cdn(uri) {
            self.cdn.build_url(uri, &self.sized_edits(width, height))
        } else if self.presets.debug_placeholders {
            self.placeholder_image()
        } else {
            uri.to_owned()
        }
    }

    /// Square avatar of `avatar_uri`, scaled for `resolution`.
    pub fn avatar_url(&self, avatar_uri: &str, resolution: f64) -> String {
        if !self.cdn.is_served_from_cdn(avatar_uri) {
            return avatar_uri.to_owned();
        }

        let resolution = if resolution.is_finite() && resolution > 0.0 {
            resolution.round() as Width
        } else {
            1
        };
        let size = resolution.saturating_mul(self.presets.avatar_width);

        self.cdn.build_url(avatar_uri, &self.sized_edits(size, size))
    }

    /// Regular sized image of `resource`.
    pub fn base_image_url(&self, resource: &Value, accessor: &ImageAccessor) -> String {
        self.sized_url(
            accessor.image_uri(resource),
            self.presets.base_width,
            self.presets.base_height(),
        )
    }

    /// Large image of `resource`.
    pub fn large_image_url(&self, resource: &Value, accessor: &ImageAccessor) -> String {
        self.sized_url(
            accessor.image_uri(resource),
            self.presets.large_width(),
            self.presets.large_height(),
        )
    }

    /// Hero image converted to WebP when possible.
    ///
    /// URLs carrying legacy filters are left alone.
    pub fn hero_url(&self, url: &str) -> String {
        let convert = !url.is_empty()
            && self.accept_webp
            && !url.contains(LEGACY_FILTERS_MARKER)
            && self.cdn.is_served_from_cdn(url);

        if convert {
            self.cdn
                .build_url(url, &Edits::new().to_format(OutputFormat::Webp))
        } else {
            url.to_owned()
        }
    }

    /// Placeholder image in the regular size.
    pub fn placeholder_image(&self) -> String {
        let base = self.presets.placeholder_base_url.as_deref().unwrap_or_default();
        format!(
            "{base}/{}/{}/nature",
            self.presets.base_width,
            self.presets.base_height()
        )
    }
}

/// Builder for [`ImageVariants`].
#[derive(Debug)]
pub struct ImageVariantsBuilder {
    cdn: CdnImage,
    presets: ImagePresets,
    accept_webp: bool,
}

impl ImageVariantsBuilder {
    /// Create a new [`ImageVariantsBuilder`] with the provided [`CdnImage`].
    pub fn new(cdn: CdnImage) -> Self {
        Self {
            cdn,
            presets: ImagePresets::default(),
            accept_webp: false,
        }
    }

    /// Configure presets.
    pub fn set_presets(self, presets: ImagePresets) -> Self {
        Self { presets, ..self }
    }

    /// Configure WebP conversion, see
    /// [`accepts_webp`](crate::image_type::accepts_webp).
    pub fn set_accept_webp(self, accept_webp: bool) -> Self {
        Self {
            accept_webp,
            ..self
        }
    }

    /// Build the [`ImageVariants`].
    pub fn build(self) -> ImageVariants {
        ImageVariants {
            cdn: self.cdn,
            presets: self.presets,
            accept_webp: self.accept_webp,
        }
    }
}
