use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use pretty_assertions::assert_eq;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use sharp_cdn_image::{CdnConfig, CdnImage, Edits, OutputFormat, UrlOptions};

const BASE: &str = "https://cdn.x.com";

fn cdn() -> CdnImage {
    CdnImage::new(CdnConfig::new(BASE, "b"))
}

fn decode(url: &str) -> Value {
    let encoded = url
        .strip_prefix(BASE)
        .and_then(|rest| rest.strip_prefix('/'))
        .expect("URL built on the CDN base");
    let json = STANDARD.decode(encoded).expect("standard Base64");
    serde_json::from_slice(&json).expect("JSON image request")
}

#[test]
fn foreign_urls_are_returned_unchanged() {
    let cdn = cdn();
    let edits = Edits::new().resize(100, 100).to_format(OutputFormat::Webp);

    for uri in [
        "https://example.com/pic.jpg",
        "http://cdn.x.com/pic.jpg",
        "https://cdn.x.co/pic.jpg",
        "data:image/png;base64,iVBORw0KGgo=",
    ] {
        assert_eq!(cdn.build_url(uri, &edits), uri);
    }
}

#[test]
fn encoding_is_deterministic() {
    let cdn = cdn();
    let edits = Edits::new().resize(300, 200).insert("rotate", 90);

    let first = cdn.build_url("https://cdn.x.com/folder/pic.jpg", &edits);
    let second = cdn.build_url("https://cdn.x.com/folder/pic.jpg", &edits);

    assert_eq!(first, second);
}

#[test]
fn leading_slash_is_stripped_from_key() {
    let url = cdn().build_url("https://cdn.x.com/folder/pic.jpg", &Edits::new());

    assert_eq!(
        decode(&url),
        json!({ "bucket": "b", "key": "folder/pic.jpg", "edits": {} })
    );
}

#[test]
fn exact_wire_format() {
    let edits = Edits::new().resize(150, 100);
    let url = cdn().build_url("https://cdn.x.com/pic.jpg", &edits);

    let expected = STANDARD.encode(
        r#"{"bucket":"b","key":"pic.jpg","edits":{"resize":{"width":150,"height":100}}}"#,
    );
    assert_eq!(url, format!("{BASE}/{expected}"));
}

#[test]
fn bare_keys_are_editable() {
    let edits = Edits::new().resize(10, 10);
    let url = cdn().build_url("folder/pic.jpg", &edits);

    assert_ne!(url, "folder/pic.jpg");
    assert_eq!(
        decode(&url),
        json!({
            "bucket": "b",
            "key": "folder/pic.jpg",
            "edits": { "resize": { "width": 10, "height": 10 } }
        })
    );
}

#[test]
fn bare_key_with_leading_slash() {
    let url = cdn().build_url("/folder/pic.jpg", &Edits::new());
    assert_eq!(decode(&url)["key"], "folder/pic.jpg");
}

#[test]
fn bucket_can_be_overridden_per_call() {
    let url = cdn().build_url_with(
        "https://cdn.x.com/pic.jpg",
        &Edits::new(),
        &UrlOptions::new().bucket("other"),
    );

    assert_eq!(decode(&url)["bucket"], "other");
}

#[test]
fn trailing_slash_on_base_is_ignored() {
    let with_slash = CdnImage::new(CdnConfig::new("https://cdn.x.com/", "b"));
    let without_slash = cdn();
    let edits = Edits::new().to_format(OutputFormat::Webp);

    for uri in ["https://cdn.x.com/pic.jpg", "pic.jpg"] {
        assert_eq!(
            with_slash.build_url(uri, &edits),
            without_slash.build_url(uri, &edits)
        );
    }
}

#[test]
fn percent_encoded_and_unicode_paths_decode_to_literal_keys() {
    let cdn = cdn();

    let url = cdn.build_url("https://cdn.x.com/my%20folder/caf%C3%A9.jpg", &Edits::new());
    assert_eq!(decode(&url)["key"], "my folder/café.jpg");

    let url = cdn.build_url("https://cdn.x.com/photos/東京.jpg", &Edits::new());
    assert_eq!(decode(&url)["key"], "photos/東京.jpg");
}

#[test]
fn origin_bucket_urls_are_editable() {
    let url = cdn().build_url("https://b.s3.amazonaws.com/pic.jpg", &Edits::new());
    assert_eq!(decode(&url)["key"], "pic.jpg");
}

#[test]
fn any_serializable_edits_are_accepted() {
    let mut edits = BTreeMap::new();
    edits.insert("grayscale", true);

    let url = cdn().build_url("pic.jpg", &edits);
    assert_eq!(decode(&url)["edits"], json!({ "grayscale": true }));
}

struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("cannot serialize"))
    }
}

#[test]
fn serialization_failure_returns_uri() {
    let cdn = cdn();

    assert_eq!(cdn.build_url("pic.jpg", &Unserializable), "pic.jpg");
    assert_eq!(
        cdn.build_url("https://cdn.x.com/pic.jpg", &Unserializable),
        "https://cdn.x.com/pic.jpg"
    );

    // JSON object keys must be strings.
    let mut edits = BTreeMap::new();
    edits.insert((1, 2), "crop");
    assert_eq!(cdn.build_url("pic.jpg", &edits), "pic.jpg");
}

#[test]
fn adversarial_uris_never_panic() {
    let cdn = cdn();
    let edits = Edits::new().resize(1, 1);

    for uri in [
        "",
        "null",
        "undefined",
        "%",
        "%%%",
        "/",
        "//",
        "https://",
        "https://cdn.x.com",
        "https://cdn.x.com/%ZZ",
        "https://cdn.x.com/%FF",
        "http://[::1",
        "\u{0}",
        "🦀/🖼️.png",
    ] {
        let url = cdn.build_url(uri, &edits);
        assert!(url == uri || decode(&url).is_object(), "unexpected URL for {uri:?}: {url}");
    }
}
