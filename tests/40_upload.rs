mod common;

use axum::http::StatusCode;

use common::{get_raw, post_multipart, spawn_app, spawn_app_with, test_config, Part};

#[tokio::test]
async fn image_is_stored_and_url_returned() {
    let app = spawn_app();

    let (status, body) = post_multipart(
        &app.router,
        "/api/upload",
        &[Part::file(
            "image",
            "team photo.png",
            "image/png",
            vec![0x89, 0x50, 0x4e, 0x47],
        )],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let url = body["url"].as_str().unwrap();
    assert!(url.contains("/uploads/"), "got {url}");
    // Sanitized stored name: spaces became dashes, extension kept.
    assert!(url.ends_with("-team-photo.png"), "got {url}");

    let stored_name = url.rsplit('/').next().unwrap();
    let on_disk = std::fs::read(app.upload_dir.join(stored_name)).expect("stored file");
    assert_eq!(on_disk, vec![0x89, 0x50, 0x4e, 0x47]);
}

#[tokio::test]
async fn stored_image_is_served_back() {
    let app = spawn_app();

    let (_, body) = post_multipart(
        &app.router,
        "/api/upload",
        &[Part::file("image", "pic.png", "image/png", vec![1, 2, 3])],
    )
    .await;
    let url = body["url"].as_str().unwrap();
    let path = url.splitn(4, '/').nth(3).map(|p| format!("/{p}")).unwrap();

    let (status, bytes) = get_raw(&app.router, &path).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes.to_vec(), vec![1, 2, 3]);
}

#[tokio::test]
async fn missing_file_returns_404_from_static_dir() {
    let app = spawn_app();
    let (status, _) = get_raw(&app.router, "/uploads/does-not-exist.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_image_is_rejected_and_nothing_is_written() {
    let mut config = test_config();
    config.upload.max_image_bytes = 1024;
    let app = spawn_app_with(config);

    let (status, body) = post_multipart(
        &app.router,
        "/api/upload",
        &[Part::file("image", "big.png", "image/png", vec![0; 4096])],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    let entries: Vec<_> = std::fs::read_dir(&app.upload_dir).unwrap().collect();
    assert!(entries.is_empty(), "upload dir should stay empty");
}

#[tokio::test]
async fn missing_image_part_is_a_validation_error() {
    let app = spawn_app();

    let (status, body) = post_multipart(
        &app.router,
        "/api/upload",
        &[Part::text("caption", "no file here")],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(body["errors"][0]["field"], "image");
}
