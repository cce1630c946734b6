//! Core data types for the PriceScout pipeline.
//!
//! Model-facing types are deliberately loose: every field is optional and
//! unknown fields are ignored, because the model decides what it sends back.
//! Display defaults live in accessor methods, not in the stored data.

use serde::{Deserialize, Deserializer, Serialize};

const UNKNOWN: &str = "Unknown";

/// What the vision model thinks the photographed product is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductIdentification {
    /// Specific product name with brand and model if visible
    #[serde(deserialize_with = "text_or_none")]
    pub product_name: Option<String>,

    /// Brand name
    #[serde(deserialize_with = "text_or_none")]
    pub brand: Option<String>,

    /// Product category (electronics/fashion/home/etc)
    #[serde(deserialize_with = "text_or_none")]
    pub category: Option<String>,

    /// Brief description of visible features
    #[serde(deserialize_with = "text_or_none")]
    pub description: Option<String>,

    /// Search query tuned for Indian e-commerce sites
    #[serde(deserialize_with = "text_or_none")]
    pub search_query: Option<String>,
}

impl ProductIdentification {
    pub fn product_name_or_unknown(&self) -> &str {
        non_empty(&self.product_name).unwrap_or(UNKNOWN)
    }

    pub fn brand_or_unknown(&self) -> &str {
        non_empty(&self.brand).unwrap_or(UNKNOWN)
    }

    pub fn category_or_unknown(&self) -> &str {
        non_empty(&self.category).unwrap_or(UNKNOWN)
    }

    pub fn description_or_default(&self) -> &str {
        non_empty(&self.description).unwrap_or("No description available")
    }
}

/// One seller's estimated price and terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetailerQuote {
    /// Seller name (e.g. "Amazon India")
    #[serde(deserialize_with = "text_or_none")]
    pub retailer: Option<String>,

    /// Estimated price in INR. `None` when missing, null, or not a number.
    #[serde(deserialize_with = "number_or_none")]
    pub price: Option<f64>,

    /// "new", "refurbished", ...
    #[serde(deserialize_with = "text_or_none")]
    pub condition: Option<String>,

    /// Store link
    #[serde(deserialize_with = "text_or_none")]
    pub url: Option<String>,

    /// Free-text availability
    #[serde(deserialize_with = "text_or_none")]
    pub availability: Option<String>,

    /// Typical offer (card discount, EMI, cashback)
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "text_or_none")]
    pub discount: Option<String>,
}

impl RetailerQuote {
    /// Price, if the model gave a positive one.
    pub fn valid_price(&self) -> Option<f64> {
        self.price.filter(|p| *p > 0.0)
    }

    pub fn retailer_or_unknown(&self) -> &str {
        non_empty(&self.retailer).unwrap_or(UNKNOWN)
    }

    pub fn condition_or_default(&self) -> &str {
        non_empty(&self.condition).unwrap_or("New")
    }

    pub fn availability_or_default(&self) -> &str {
        non_empty(&self.availability).unwrap_or("Check availability")
    }

    pub fn discount(&self) -> Option<&str> {
        non_empty(&self.discount)
    }

    pub fn url(&self) -> Option<&str> {
        non_empty(&self.url)
    }
}

/// Everything returned by one price search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSearchResult {
    /// The query text the prices were requested for
    pub product_name: String,

    /// Local time of the search, `%Y-%m-%d %H:%M`
    pub search_date: String,

    /// Quotes exactly as returned by the model (unfiltered, unsorted)
    pub retailers: Vec<RetailerQuote>,

    /// Full model text, kept for inspection
    pub raw_response: String,

    /// Disclaimer shown alongside the prices
    pub note: String,
}

/// A quote placed in the sorted comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedQuote {
    /// 1-based position in ascending price order
    pub rank: usize,

    /// The lowest-priced entry
    pub best_deal: bool,

    /// Positive price of this quote
    pub price: f64,

    pub quote: RetailerQuote,
}

/// Summary statistics over the valid quotes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceAnalytics {
    pub lowest: f64,
    pub highest: f64,
    pub average: f64,
    /// `highest - lowest`
    pub savings: f64,
    /// `savings / highest * 100`
    pub savings_percent: f64,
}

/// Display-ready view of a [`PriceSearchResult`].
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub product_name: String,
    pub search_date: String,
    pub note: String,

    /// Valid quotes, ascending by price
    pub quotes: Vec<RankedQuote>,

    /// `None` when no quote had a positive price
    pub analytics: Option<PriceAnalytics>,
}

impl PriceReport {
    pub fn best_deal(&self) -> Option<&RankedQuote> {
        self.quotes.first()
    }
}

/// A record in JSON / JSONL output.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputRecord {
    Identification(ProductIdentification),
    Prices(PriceReport),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accept any JSON number; treat null, strings, and everything else as no price.
fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Accept strings as-is and render numbers and booleans as text. Null, arrays,
/// and objects read as absent.
fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}
