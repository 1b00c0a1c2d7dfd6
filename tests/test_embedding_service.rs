use serde_json::json;
use std::time::Duration;
use visual_matcher::domain::ports::embedding_port::EmbeddingProvider;
use visual_matcher::domain::values::canonical_image::CanonicalImage;
use visual_matcher::infrastructure::embeddings::http::HttpEmbeddingProvider;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer, dimension: usize) -> HttpEmbeddingProvider {
    HttpEmbeddingProvider::new(
        server.uri(),
        Some("clip-test".into()),
        Some("secret".into()),
        dimension,
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_text_embedding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed/text"))
        .and(header("authorization", "Bearer secret"))
        .and(body_partial_json(json!({"model": "clip-test", "text": "red chair"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [0.5, 0.5, 0.0]})))
        .expect(1)
        .mount(&server)
        .await;

    let v = provider(&server, 3).embed_text("red chair").await.unwrap();
    assert_eq!(v.as_slice(), &[0.5, 0.5, 0.0]);
}

#[tokio::test]
async fn test_image_embedding_sends_png() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed/image"))
        .and(body_partial_json(json!({"model": "clip-test"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [1.0, 0.0, 0.0]})))
        .mount(&server)
        .await;

    let img = CanonicalImage::from_rgb(image::RgbImage::from_pixel(2, 2, image::Rgb([9, 9, 9])));
    let v = provider(&server, 3).embed_image(&img).await.unwrap();
    assert_eq!(v.dimension(), 3);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["image"].as_str().unwrap().starts_with("iVBOR"));
}

#[tokio::test]
async fn test_service_failures_are_embedding_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed/text"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let err = provider(&server, 3).embed_text("x").await.unwrap_err();
    assert_eq!(err.kind(), "embedding_compute");
}

#[tokio::test]
async fn test_dimension_mismatch_and_empty_vector() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embed/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [1.0, 2.0]})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/embed/image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": []})))
        .mount(&server)
        .await;

    let p = provider(&server, 512);
    assert_eq!(p.embed_text("x").await.unwrap_err().kind(), "embedding_compute");

    let img = CanonicalImage::from_rgb(image::RgbImage::from_pixel(1, 1, image::Rgb([0, 0, 0])));
    assert_eq!(p.embed_image(&img).await.unwrap_err().kind(), "embedding_compute");
}

#[tokio::test]
async fn test_unreachable_service() {
    let p = HttpEmbeddingProvider::new(
        "http://127.0.0.1:1".into(),
        None,
        None,
        0,
        Duration::from_secs(1),
    );
    assert_eq!(p.descriptor(), "clip-ViT-B-32");
    assert_eq!(p.embed_text("x").await.unwrap_err().kind(), "embedding_compute");
}
