//! Price estimation: prompts and response parsing.
//!
//! The model has no web access. Prices are its estimate of typical Indian
//! market prices and every result carries [`DISCLAIMER`].

use chrono::{DateTime, Local};

use crate::config::PricingConfig;
use crate::error::{PipelineError, Stage};
use crate::extract::{extract_as, JsonKind};
use crate::llm::LlmRequest;
use crate::types::{PriceSearchResult, RetailerQuote};

/// System instruction for the pricing model.
pub const PRICING_SYSTEM_PROMPT: &str = "You are an expert on Indian e-commerce pricing. Provide realistic price estimates based on your knowledge of the Indian market. Focus on these platforms: Amazon India, Flipkart, Myntra, Ajio, Meesho, Snapdeal.

Important:
1. All prices must be in Indian Rupees (INR)
2. Consider Indian market conditions and pricing
3. Include typical discounts and offers
4. Be realistic about availability
5. Return ONLY valid JSON, no explanations";

/// Note attached to every price result.
pub const DISCLAIMER: &str = "Prices are AI estimates based on market knowledge. Please verify on actual websites before purchasing.";

/// Format of [`PriceSearchResult::search_date`].
pub const SEARCH_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// User message asking for at least `min_retailers` quotes.
pub fn pricing_prompt(query: &str, min_retailers: u32) -> String {
    format!(
        r#"Based on your knowledge of Indian e-commerce, provide typical current prices for: {query}

List at least {min_retailers} major Indian retailers with realistic price estimates.

Return ONLY a JSON array with NO other text, explanations, or markdown:
[
  {{
    "retailer": "Amazon India",
    "price": 89999,
    "condition": "new",
    "url": "https://amazon.in",
    "availability": "typically in stock",
    "discount": "10% off on HDFC cards"
  }}
]

Remember:
- Prices in INR (Indian Rupees)
- Include Amazon India, Flipkart, Myntra, Ajio, Meesho
- Realistic Indian market prices
- Common payment offers (card discounts, EMI, COD)
- Return ONLY JSON array, nothing else"#
    )
}

/// Build the pricing request for a search query.
pub fn pricing_request(query: &str, pricing: &PricingConfig) -> LlmRequest {
    LlmRequest::text(
        &pricing.model,
        PRICING_SYSTEM_PROMPT,
        pricing_prompt(query, pricing.min_retailers),
    )
    .with_max_tokens(pricing.max_tokens)
    .with_temperature(pricing.temperature)
}

/// Parse the pricing model's text into a [`PriceSearchResult`].
///
/// An array that parses but is empty is `EmptyResult`, not an extraction
/// failure.
pub fn parse_price_response(
    query: &str,
    text: &str,
    searched_at: DateTime<Local>,
) -> Result<PriceSearchResult, PipelineError> {
    let retailers: Vec<RetailerQuote> =
        extract_as(text, JsonKind::Array).map_err(|source| PipelineError::Extraction {
            stage: Stage::PriceSearch,
            source,
        })?;

    if retailers.is_empty() {
        return Err(PipelineError::EmptyResult {
            query: query.to_string(),
            raw_response: text.to_string(),
        });
    }

    Ok(PriceSearchResult {
        product_name: query.to_string(),
        search_date: searched_at.format(SEARCH_DATE_FORMAT).to_string(),
        retailers,
        raw_response: text.to_string(),
        note: DISCLAIMER.to_string(),
    })
}
