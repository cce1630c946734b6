//! End-to-end pipeline tests: real image file, real HTTP provider, mock endpoint.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pricescout_core::{Config, PipelineError, PipelineState, PriceFinder, Session, Stage};

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.endpoint = format!("{}/v1/chat/completions", server.uri());
    config.api.api_key = "test-key".to_string();
    config.limits.llm_timeout_ms = 5_000;
    config
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

fn write_photo(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("headphones.png");
    let image = RgbaImage::from_pixel(32, 32, Rgba([20, 20, 20, 180]));
    DynamicImage::ImageRgba8(image)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

async fn mount_identification(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains("image_url"))
        .respond_with(completion(content))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn photo_to_sorted_report() {
    let server = MockServer::start().await;
    mount_identification(
        &server,
        "Sure! ```json\n{\"product_name\": \"Sony WH-1000XM5\", \"brand\": \"Sony\", \"search_query\": \"\"}\n```",
    )
    .await;
    Mock::given(method("POST"))
        .and(body_string_contains("prices for: Sony WH-1000XM5"))
        .respond_with(completion(
            r#"[{"retailer": "Amazon India", "price": 29990},
                {"retailer": "Flipkart", "price": 26990, "discount": "No cost EMI"},
                {"retailer": "Meesho", "price": "N/A"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let finder = PriceFinder::from_config(&config_for(&server)).unwrap();
    let mut session = Session::new();

    let image = finder.load_image(&write_photo(&dir)).await.unwrap();
    let report = finder.run_image(&mut session, &image).await.unwrap();

    assert_eq!(report.product_name, "Sony WH-1000XM5");
    assert_eq!(report.quotes.len(), 2);
    let best = report.best_deal().unwrap();
    assert_eq!(best.quote.retailer_or_unknown(), "Flipkart");
    assert_eq!(best.quote.discount(), Some("No cost EMI"));

    let stats = report.analytics.unwrap();
    assert_eq!(stats.savings, 3000.0);
    assert_eq!(session.state(), PipelineState::Displayed);
    assert_eq!(session.result().unwrap().retailers.len(), 3);
}

#[tokio::test]
async fn unauthorized_identification_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let finder = PriceFinder::from_config(&config_for(&server)).unwrap();
    let mut session = Session::new();
    let image = DynamicImage::new_rgb8(8, 8);

    let err = finder.run_image(&mut session, &image).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Identification));
    assert_eq!(err.raw_text(), Some("invalid api key"));
    assert_eq!(session.state(), PipelineState::Idle);
}

#[tokio::test]
async fn empty_price_list_is_soft_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("```json\n[]\n```"))
        .mount(&server)
        .await;

    let finder = PriceFinder::from_config(&config_for(&server)).unwrap();
    let mut session = Session::new();

    let err = finder
        .run_query(&mut session, "discontinued gadget")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::EmptyResult { .. }));
    assert!(err.is_soft());
    assert!(session.result().is_none());
}

#[test]
fn missing_credential_fails_when_building_finder() {
    let mut config = Config::default();
    config.api.api_key = "${PRICESCOUT_TEST_UNSET_KEY}".to_string();

    let err = PriceFinder::from_config(&config).err().unwrap();
    match err {
        PipelineError::MissingCredential { env_var } => {
            assert_eq!(env_var, "PRICESCOUT_TEST_UNSET_KEY")
        }
        other => panic!("expected MissingCredential, got: {other:?}"),
    }
}
