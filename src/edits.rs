use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::image_type::OutputFormat;

/// Resize width, in pixels.
pub type Width = u32;
/// Resize height, in pixels.
pub type Height = u32;

/// Edit operations forwarded to the image handler.
///
/// Operation names and parameters are opaque: they are passed through verbatim
/// and serialized as a JSON object in insertion order.
///
/// # Example
///
/// ```rust
/// use sharp_cdn_image::{image_type::OutputFormat, Edits};
///
/// let edits = Edits::new()
///     .resize(150, 100)
///     .to_format(OutputFormat::Webp)
///     .insert("grayscale", true);
///
/// assert_eq!(
///     serde_json::to_string(&edits).unwrap(),
///     r#"{"resize":{"width":150,"height":100},"toFormat":"webp","grayscale":true}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Edits(Map<String, Value>);

impl Edits {
    /// Create an empty set of edits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary edit operation, replacing any previous value.
    pub fn insert(mut self, name: impl Into<String>, params: impl Into<Value>) -> Self {
        self.0.insert(name.into(), params.into());
        self
    }

    /// Set the `resize` operation.
    pub fn resize(self, width: Width, height: Height) -> Self {
        self.insert("resize", json!({ "width": width, "height": height }))
    }

    /// Set the `toFormat` operation.
    pub fn to_format(self, format: OutputFormat) -> Self {
        self.insert("toFormat", format.as_str())
    }

    /// Parameters of the operation `name`, if set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no operation is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Edits {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Edits {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
