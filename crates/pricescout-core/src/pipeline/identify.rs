//! Product identification: vision prompt, response parsing, query derivation.

use crate::config::VisionConfig;
use crate::error::{PipelineError, Stage};
use crate::extract::{extract_as, JsonKind};
use crate::llm::{ImageInput, LlmRequest};
use crate::types::ProductIdentification;

/// Instruction sent alongside the product photo.
pub const IDENTIFY_PROMPT: &str = r#"Analyze this product image carefully and identify what it is. Be as specific as possible about brand, model, and features.

Return ONLY a valid JSON object with no additional text, explanations, or markdown:
{
    "product_name": "specific product name with brand and model if visible",
    "brand": "brand name",
    "category": "product category (electronics/fashion/home/etc)",
    "description": "brief description of visible features",
    "search_query": "optimized search query for Indian e-commerce sites"
}

Important: Return ONLY the JSON object, nothing else."#;

/// Build the vision request for an encoded photo.
pub fn identification_request(image: ImageInput, vision: &VisionConfig) -> LlmRequest {
    LlmRequest::vision(&vision.model, image, IDENTIFY_PROMPT)
        .with_max_tokens(vision.max_tokens)
        .with_temperature(vision.temperature)
}

/// Parse the vision model's text into a [`ProductIdentification`].
pub fn parse_identification(text: &str) -> Result<ProductIdentification, PipelineError> {
    extract_as(text, JsonKind::Object).map_err(|source| PipelineError::Extraction {
        stage: Stage::Identification,
        source,
    })
}

/// Pick the text to search prices for.
///
/// Prefers the model's tuned `search_query`, falls back to `product_name`.
pub fn derive_query(identification: &ProductIdentification) -> Result<String, PipelineError> {
    [&identification.search_query, &identification.product_name]
        .into_iter()
        .filter_map(|field| field.as_deref().map(str::trim))
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(PipelineError::MissingQuery)
}
