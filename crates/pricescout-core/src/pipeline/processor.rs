//! Pipeline orchestration: identify → derive query → fetch prices → present.
//!
//! Every step runs to completion before the next starts and nothing is
//! retried. A failure ends the action, returns the session to idle, and
//! leaves previously held results untouched.

use image::DynamicImage;
use std::path::Path;

use crate::config::{Config, PricingConfig, VisionConfig};
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::llm::{LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse};
use crate::session::{PipelineState, Session};
use crate::types::{PriceReport, PriceSearchResult, ProductIdentification};

use super::decode::ImageDecoder;
use super::encode::encode_for_upload;
use super::identify::{derive_query, identification_request, parse_identification};
use super::present::present;
use super::pricing::{parse_price_response, pricing_request};
use super::validate::Validator;

/// Runs the two-stage identify-then-price pipeline against one provider.
pub struct PriceFinder {
    provider: Box<dyn LlmProvider>,
    vision: VisionConfig,
    pricing: PricingConfig,
    validator: Validator,
    decoder: ImageDecoder,
}

impl PriceFinder {
    /// Build a finder with the provider described by `config`.
    ///
    /// Fails with `MissingCredential` if no API key is configured.
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let provider = LlmProviderFactory::create(config)?;
        Ok(Self::new(provider, config))
    }

    /// Build a finder around an existing provider.
    pub fn new(provider: Box<dyn LlmProvider>, config: &Config) -> Self {
        Self {
            provider,
            vision: config.vision.clone(),
            pricing: config.pricing.clone(),
            validator: Validator::new(config.limits.clone(), config.input.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
        }
    }

    /// Validate and decode an image file.
    pub async fn load_image(&self, path: &Path) -> PipelineResult<DynamicImage> {
        self.validator.validate(path)?;
        let decoded = self.decoder.decode(path).await?;
        tracing::debug!(
            width = decoded.width,
            height = decoded.height,
            format = ?decoded.format,
            "Decoded {:?}",
            path
        );
        Ok(decoded.image)
    }

    /// Ask the vision model what product the image shows.
    pub async fn identify(&self, image: &DynamicImage) -> PipelineResult<ProductIdentification> {
        let input = encode_for_upload(image)?;
        let request = identification_request(input, &self.vision);
        let response = self.call(Stage::Identification, &request).await?;
        let identification = parse_identification(&response.text)?;

        tracing::info!(
            product = identification.product_name_or_unknown(),
            "Product identified"
        );
        Ok(identification)
    }

    /// Ask the text model for retailer price estimates.
    pub async fn fetch_prices(&self, query: &str) -> PipelineResult<PriceSearchResult> {
        let request = pricing_request(query, &self.pricing);
        let response = self.call(Stage::PriceSearch, &request).await?;
        let result = parse_price_response(query, &response.text, chrono::Local::now())?;

        tracing::info!(
            query,
            retailers = result.retailers.len(),
            "Price estimates received"
        );
        Ok(result)
    }

    /// Identify the product in `image` and hold it in the session.
    pub async fn identify_into(
        &self,
        session: &mut Session,
        image: &DynamicImage,
    ) -> PipelineResult<ProductIdentification> {
        session.advance(PipelineState::Identifying);
        match self.identify(image).await {
            Ok(identification) => {
                session.set_identification(identification.clone());
                Ok(identification)
            }
            Err(e) => {
                session.abort();
                Err(e)
            }
        }
    }

    /// Fetch prices for `query`, hold the result in the session, and present it.
    pub async fn run_query(
        &self,
        session: &mut Session,
        query: &str,
    ) -> PipelineResult<PriceReport> {
        session.advance(PipelineState::PricingQuery);
        match self.fetch_prices(query).await {
            Ok(result) => {
                let report = present(&result);
                session.set_result(result);
                session.mark_displayed();
                Ok(report)
            }
            Err(e) => {
                if e.is_soft() {
                    tracing::warn!(query, "{e}");
                }
                session.abort();
                Err(e)
            }
        }
    }

    /// Full photo flow: identify, derive the query, fetch and present prices.
    pub async fn run_image(
        &self,
        session: &mut Session,
        image: &DynamicImage,
    ) -> PipelineResult<PriceReport> {
        let identification = self.identify_into(session, image).await?;
        let query = derive_query(&identification).inspect_err(|_| session.abort())?;
        self.run_query(session, &query).await
    }

    async fn call(&self, stage: Stage, request: &LlmRequest) -> PipelineResult<LlmResponse> {
        let response = self
            .provider
            .generate(request)
            .await
            .map_err(|source| PipelineError::Llm { stage, source })?;

        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            tokens = ?response.tokens_used,
            latency_ms = response.latency_ms,
            "{stage} call complete"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Provider that replays canned replies and records what it was sent.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        requests: Arc<Mutex<Vec<LlmRequest>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, LlmError>>) -> (Self, Arc<Mutex<Vec<LlmRequest>>>) {
            let requests = Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                replies: Mutex::new(replies.into()),
                requests: Arc::clone(&requests),
            };
            (provider, requests)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra LLM call");
            reply.map(|text| LlmResponse {
                text,
                model: request.model.clone(),
                tokens_used: None,
                latency_ms: 1,
            })
        }
    }

    fn finder(replies: Vec<Result<String, LlmError>>) -> (PriceFinder, Arc<Mutex<Vec<LlmRequest>>>) {
        let (provider, requests) = ScriptedProvider::new(replies);
        (PriceFinder::new(Box::new(provider), &Config::default()), requests)
    }

    const IDENTIFIED: &str = r#"{"product_name": "Sony WH-1000XM5", "brand": "Sony", "category": "electronics", "description": "Over-ear headphones", "search_query": ""}"#;

    const PRICES: &str = r#"```json
[
  {"retailer": "Amazon India", "price": 89999, "condition": "new"},
  {"retailer": "Meesho", "price": 0},
  {"retailer": "Flipkart", "price": 79999, "discount": "5% cashback"},
  {"retailer": "Myntra", "price": null},
  {"retailer": "Ajio", "price": 84999}
]
```"#;

    fn photo() -> DynamicImage {
        DynamicImage::new_rgba8(24, 24)
    }

    #[tokio::test]
    async fn test_run_image_end_to_end() {
        let (finder, requests) = finder(vec![Ok(IDENTIFIED.into()), Ok(PRICES.into())]);
        let mut session = Session::new();

        let report = finder.run_image(&mut session, &photo()).await.unwrap();

        let prices: Vec<f64> = report.quotes.iter().map(|q| q.price).collect();
        assert_eq!(prices, vec![79999.0, 84999.0, 89999.0]);
        assert_eq!(report.product_name, "Sony WH-1000XM5");

        assert_eq!(session.state(), PipelineState::Displayed);
        assert_eq!(
            session.identification().unwrap().brand.as_deref(),
            Some("Sony")
        );
        assert_eq!(session.result().unwrap().retailers.len(), 5);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].image.is_some());
        assert_eq!(requests[0].model, "meta-llama/llama-4-scout-17b-16e-instruct");
        assert!(requests[1].image.is_none());
        assert!(requests[1].prompt.contains("prices for: Sony WH-1000XM5"));
    }

    #[tokio::test]
    async fn test_identification_http_error_stops_before_pricing() {
        let (finder, requests) = finder(vec![Err(LlmError::Http {
            status: 401,
            body: "{\"error\":\"invalid_api_key\"}".to_string(),
        })]);
        let mut session = Session::new();

        let err = finder.run_image(&mut session, &photo()).await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Identification));
        assert!(err.to_string().contains("HTTP 401"));
        assert_eq!(session.state(), PipelineState::Idle);
        assert!(session.identification().is_none());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_query_aborts_after_identification() {
        let (finder, requests) = finder(vec![Ok(r#"{"brand": "Unknown"}"#.into())]);
        let mut session = Session::new();

        let err = finder.run_image(&mut session, &photo()).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingQuery));
        assert_eq!(session.state(), PipelineState::Idle);
        assert!(session.identification().is_some());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_price_array_is_soft_and_keeps_old_result() {
        let (finder, _) = finder(vec![Ok(PRICES.into()), Ok("[]".into())]);
        let mut session = Session::new();

        finder.run_query(&mut session, "first").await.unwrap();
        let err = finder.run_query(&mut session, "second").await.unwrap_err();

        assert!(matches!(err, PipelineError::EmptyResult { .. }));
        assert!(err.is_soft());
        assert_eq!(session.result().unwrap().product_name, "first");
        assert_eq!(session.state(), PipelineState::Idle);
    }

    #[tokio::test]
    async fn test_pricing_extraction_error_carries_raw_text() {
        let (finder, _) = finder(vec![Ok("I can't help with that.".into())]);
        let mut session = Session::new();

        let err = finder.run_query(&mut session, "kettle").await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::PriceSearch));
        assert_eq!(err.raw_text(), Some("I can't help with that."));
    }

    #[tokio::test]
    async fn test_raw_response_is_kept_verbatim() {
        let padded = format!("\n  {PRICES}  \n");
        let (finder, _) = finder(vec![Ok(padded.clone())]);
        let mut session = Session::new();

        let report = finder.run_query(&mut session, "headphones").await.unwrap();
        assert_eq!(report.quotes.len(), 3);
        assert_eq!(session.result().unwrap().raw_response, padded);
    }

    #[tokio::test]
    async fn test_new_search_replaces_result() {
        let second = r#"[{"retailer": "Snapdeal", "price": 1299}]"#;
        let (finder, _) = finder(vec![Ok(PRICES.into()), Ok(second.into())]);
        let mut session = Session::new();

        finder.run_query(&mut session, "first").await.unwrap();
        let report = finder.run_query(&mut session, "second").await.unwrap();

        assert_eq!(report.quotes.len(), 1);
        assert_eq!(session.result().unwrap().product_name, "second");
    }

    #[tokio::test]
    async fn test_load_image_rejects_unsupported_format() {
        let (finder, _) = finder(Vec::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("product.bmp");
        DynamicImage::new_rgb8(4, 4)
            .save_with_format(&path, image::ImageFormat::Bmp)
            .unwrap();

        let err = finder.load_image(&path).await.unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_load_image_png() {
        let (finder, _) = finder(Vec::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("product.png");
        DynamicImage::new_rgba8(10, 6)
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let image = finder.load_image(&path).await.unwrap();
        assert_eq!((image.width(), image.height()), (10, 6));
    }
}
