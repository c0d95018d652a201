use super::*;
use axum::{http::StatusCode, routing::get, Router};
use std::io::Cursor;
use tokio::net::TcpListener;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

async fn spawn_image_server() -> String {
    let png = png_bytes(4, 3);
    let app = Router::new()
        .route(
            "/ok",
            get(move || {
                let png = png.clone();
                async move { png }
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        )
        .route("/garbage", get(|| async { "definitely not an image" }))
        .route("/huge", get(|| async { vec![0u8; 64 * 1024] }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fetches_and_decodes_png() {
    let base = spawn_image_server().await;
    let fetcher = HttpImageFetcher::new(&format!("{base}/ok"), Duration::from_secs(5)).expect("fetcher");

    let image = fetcher.fetch_image().await.expect("image");

    assert_eq!((image.width(), image.height()), (4, 3));
    assert_eq!(&image.rgba()[..4], &[10, 20, 30, 255]);
}

#[tokio::test]
async fn error_status_maps_to_status_error() {
    let base = spawn_image_server().await;
    let fetcher = HttpImageFetcher::new(&format!("{base}/broken"), Duration::from_secs(5)).expect("fetcher");

    assert_eq!(fetcher.fetch_image().await, Err(FetchError::Status(503)));
}

#[tokio::test]
async fn undecodable_body_maps_to_decode_error() {
    let base = spawn_image_server().await;
    let fetcher = HttpImageFetcher::new(&format!("{base}/garbage"), Duration::from_secs(5)).expect("fetcher");

    assert!(matches!(fetcher.fetch_image().await, Err(FetchError::Decode(_))));
}

#[tokio::test]
async fn oversized_body_is_rejected_before_decoding() {
    let base = spawn_image_server().await;
    let fetcher = HttpImageFetcher::new(&format!("{base}/huge"), Duration::from_secs(5))
        .expect("fetcher")
        .with_max_body_bytes(1024);

    match fetcher.fetch_image().await {
        Err(FetchError::Decode(reason)) => assert!(reason.contains("exceeds 1024 bytes"), "{reason}"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn body_within_the_limit_still_decodes() {
    let base = spawn_image_server().await;
    let fetcher = HttpImageFetcher::new(&format!("{base}/ok"), Duration::from_secs(5))
        .expect("fetcher")
        .with_max_body_bytes(png_bytes(4, 3).len());

    assert!(fetcher.fetch_image().await.is_ok());
}

#[tokio::test]
async fn slow_provider_times_out() {
    let base = spawn_image_server().await;
    let fetcher = HttpImageFetcher::new(&format!("{base}/slow"), Duration::from_millis(200)).expect("fetcher");

    assert_eq!(fetcher.fetch_image().await, Err(FetchError::Timeout));
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let fetcher = HttpImageFetcher::new(&format!("http://{addr}/"), Duration::from_secs(2)).expect("fetcher");

    assert!(matches!(fetcher.fetch_image().await, Err(FetchError::Network(_))));
}

#[test]
fn rejects_invalid_endpoints() {
    assert!(matches!(
        HttpImageFetcher::new("not a url", DEFAULT_FETCH_TIMEOUT),
        Err(FetcherConfigError::InvalidUrl { .. })
    ));
    assert!(matches!(
        HttpImageFetcher::new("ftp://example.com/image", DEFAULT_FETCH_TIMEOUT),
        Err(FetcherConfigError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
}

#[test]
fn default_endpoint_is_accepted() {
    let fetcher = HttpImageFetcher::new(DEFAULT_IMAGE_URL, DEFAULT_FETCH_TIMEOUT).expect("fetcher");
    assert_eq!(fetcher.endpoint().host_str(), Some("loremflickr.com"));
}

#[test]
fn decode_image_rejects_empty_input() {
    assert!(matches!(decode_image(&[]), Err(FetchError::Decode(_))));
}
