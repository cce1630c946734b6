//! PriceScout Core - product identification and price comparison library.
//!
//! Takes a product photo (or a product name), asks a hosted vision model what
//! the product is, asks a text model for estimated Indian retail prices, and
//! turns the free-form replies into a sorted, summarized comparison.
//!
//! # Architecture
//!
//! ```text
//! Image → Validate → Decode → Encode (JPEG) → Identify → Derive query
//!       → Fetch prices → Present (filter, sort, analytics)
//! ```
//!
//! Prices are model estimates, never scraped market data.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pricescout_core::{Config, PriceFinder, Session};
//!
//! #[tokio::main]
//! async fn main() -> pricescout_core::Result<()> {
//!     let config = Config::load()?;
//!     let finder = PriceFinder::from_config(&config)?;
//!     let mut session = Session::new();
//!
//!     let image = finder.load_image("./headphones.jpg".as_ref()).await?;
//!     let report = finder.run_image(&mut session, &image).await?;
//!     if let Some(best) = report.best_deal() {
//!         println!("Best deal: {} at ₹{}", best.quote.retailer_or_unknown(), best.price);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod types;

pub use config::Config;
pub use error::{
    ConfigError, LlmError, PipelineError, PipelineResult, PriceScoutError, Result, Stage,
};
pub use extract::{extract_as, extract_json, ExtractionError, JsonKind};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{present, PriceFinder};
pub use session::{PipelineState, Session};
pub use types::{
    OutputRecord, PriceAnalytics, PriceReport, PriceSearchResult, ProductIdentification,
    RankedQuote, RetailerQuote,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
