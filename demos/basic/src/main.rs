use serde_json::json;
use sharp_cdn_image::{
    gallery::gallery_items, CdnConfig, CdnImage, Edits, ImagePresets, ImageVariantsBuilder,
    OutputFormat,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(
            |_| "demo_basic=debug,sharp_cdn_image=debug".into(),
        )))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    // Read `CDN_IMAGE_HANDLER_URL` and `CDN_BUCKET`, from `.env` if present.
    dotenvy::dotenv().ok();
    let config = CdnConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(err = %err, "falling back to the demo configuration");
        CdnConfig::new("https://cdn.example.com", "my-files")
    });
    let cdn = CdnImage::new(config);

    // URL construction.
    let edits = Edits::new().resize(150, 100).to_format(OutputFormat::Webp);
    let cdn_url = cdn.build_url("uploads/rustacean-orig-noshadow.png", &edits);
    tracing::info!(%cdn_url, "edited image");

    let foreign = "https://www.rustacean.net/assets/rustacean-orig-noshadow.png";
    let unchanged = cdn.build_url(foreign, &edits);
    tracing::info!(%unchanged, "foreign image");

    // Presentation sizes.
    let base = cdn.config().base().trim_end_matches('/').to_owned();
    let variants = ImageVariantsBuilder::new(cdn)
        .set_presets(ImagePresets {
            placeholder_base_url: Some("https://picsum.photos".into()),
            ..ImagePresets::default()
        })
        .set_accept_webp(true)
        .build();

    let avatar = variants.avatar_url(&format!("{base}/avatars/ferris.png"), 2.0);
    tracing::info!(%avatar, "avatar");

    let resource = json!({
        "name": "Ferris",
        "metadata": { "images": [
            { "url": format!("{base}/ferris/1.png") },
            { "url": format!("{base}/ferris/2.png"), "alt": "Ferris waving" }
        ] }
    });
    for item in gallery_items(&variants, &resource) {
        tracing::info!(src = %item.src, msrc = %item.msrc, alt = %item.alt, "gallery item");
    }

    Ok(())
}
