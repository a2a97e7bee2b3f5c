//! Gallery entries built from a resource's images.
use serde::Serialize;
use serde_json::Value;

use crate::{
    edits::{Height, Width},
    variants::{ImageAccessor, ImageVariants},
};

/// One picture of a gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryItem {
    /// Large image URL.
    pub src: String,
    /// Regular image URL, shown while the large one loads.
    pub msrc: String,
    /// Alternative text.
    pub alt: String,
    /// Caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Width of the large image.
    pub w: Width,
    /// Height of the large image.
    pub h: Height,
}

fn is_empty_resource(resource: &Value) -> bool {
    match resource {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Number(_) | Value::Bool(_) => true,
    }
}

/// Gallery items of `resource`, one per entry of `metadata.images`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use sharp_cdn_image::{gallery::gallery_items, CdnConfig, CdnImage, ImageVariantsBuilder};
///
/// let cdn = CdnImage::new(CdnConfig::new("https://cdn.example.com", "my-files"));
/// let variants = ImageVariantsBuilder::new(cdn).build();
///
/// let resource = json!({
///     "name": "Canoe",
///     "metadata": { "images": [{ "url": "https://cdn.example.com/canoe.jpg" }] }
/// });
///
/// let items = gallery_items(&variants, &resource);
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].alt, "Canoe - Image 1");
/// ```
pub fn gallery_items(variants: &ImageVariants, resource: &Value) -> Vec<GalleryItem> {
    if is_empty_resource(resource) {
        return Vec::new();
    }

    let presets = variants.presets();
    let name = resource
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let (w, h) = (presets.large_width(), presets.large_height());

    match resource.pointer("/metadata/images").and_then(Value::as_array) {
        Some(images) => images
            .iter()
            .enumerate()
            .map(|(i, image)| {
                let accessor = ImageAccessor::Index(i);
                let text = |field: &str| {
                    image
                        .get(field)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                };

                GalleryItem {
                    src: variants.large_image_url(resource, &accessor),
                    msrc: variants.base_image_url(resource, &accessor),
                    alt: text("alt")
                        .map(str::to_owned)
                        .unwrap_or_else(|| format!("{name} - Image {}", i + 1)),
                    title: Some(text("description").unwrap_or_default().to_owned()),
                    w,
                    h,
                }
            })
            .collect(),

        None if presets.debug_placeholders => {
            let accessor = ImageAccessor::default();
            vec![GalleryItem {
                src: variants.large_image_url(resource, &accessor),
                msrc: variants.base_image_url(resource, &accessor),
                alt: name.to_owned(),
                title: None,
                w,
                h,
            }]
        }

        None => Vec::new(),
    }
}
