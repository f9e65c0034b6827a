mod common;

use common::{png_bytes, png_data_uri, solid_image};
use image::Rgba;
use mvu_canvas::canvas::{ImageCache, ImageError, ImageLoader, SourceLoader};
use tempfile::TempDir;

#[tokio::test]
async fn relative_paths_resolve_against_asset_root() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("ball.png"), png_bytes(&solid_image(3, 2, [9, 8, 7, 255])))
        .expect("write png");
    let loader = SourceLoader::new(dir.path());

    let image = loader.load("ball.png").await.expect("loads");
    assert_eq!(image.dimensions(), (3, 2));
    assert_eq!(*image.get_pixel(0, 0), Rgba([9, 8, 7, 255]));

    let absolute = format!("file://{}", dir.path().join("ball.png").display());
    assert!(loader.load(&absolute).await.is_ok());
}

#[tokio::test]
async fn missing_file_is_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let loader = SourceLoader::new(dir.path());
    assert!(matches!(
        loader.load("nope.png").await,
        Err(ImageError::Read { .. })
    ));
}

#[tokio::test]
async fn garbage_bytes_are_decode_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("bad.png"), b"not an image").expect("write");
    let loader = SourceLoader::new(dir.path());
    assert!(matches!(
        loader.load("bad.png").await,
        Err(ImageError::Decode { .. })
    ));
}

#[tokio::test]
async fn cache_miss_loads_in_background() {
    let cache = ImageCache::with_default_loader();
    let src = png_data_uri(&solid_image(1, 1, [1, 2, 3, 255]));

    assert!(cache.get(&src).is_none());
    assert!(cache.is_loading(&src));
    assert_eq!(cache.len(), 1);

    let image = cache.load(&src).await.expect("loads");
    assert_eq!(*image.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    assert!(cache.is_loaded(&src));
    assert!(cache.get(&src).is_some());
}
