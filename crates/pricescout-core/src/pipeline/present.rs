//! Turn a raw price result into a sorted, summarized comparison.

use crate::types::{PriceAnalytics, PriceReport, PriceSearchResult, RankedQuote};

/// Filter, sort, and summarize a price search.
///
/// Quotes without a positive price are dropped (zero is not treated as a
/// legitimate free price). The rest are sorted ascending, ties keep the
/// model's order, and the first is flagged as the best deal.
pub fn present(result: &PriceSearchResult) -> PriceReport {
    let mut valid: Vec<(f64, _)> = result
        .retailers
        .iter()
        .filter_map(|quote| quote.valid_price().map(|price| (price, quote)))
        .collect();
    valid.sort_by(|a, b| a.0.total_cmp(&b.0));

    let prices: Vec<f64> = valid.iter().map(|(price, _)| *price).collect();
    let quotes = valid
        .into_iter()
        .enumerate()
        .map(|(idx, (price, quote))| RankedQuote {
            rank: idx + 1,
            best_deal: idx == 0,
            price,
            quote: quote.clone(),
        })
        .collect();

    PriceReport {
        product_name: result.product_name.clone(),
        search_date: result.search_date.clone(),
        note: result.note.clone(),
        quotes,
        analytics: analytics(&prices),
    }
}

/// Summary statistics over ascending-sorted positive prices.
fn analytics(sorted_prices: &[f64]) -> Option<PriceAnalytics> {
    let lowest = *sorted_prices.first()?;
    let highest = *sorted_prices.last()?;
    let average = sorted_prices.iter().sum::<f64>() / sorted_prices.len() as f64;
    let savings = highest - lowest;

    Some(PriceAnalytics {
        lowest,
        highest,
        average,
        savings,
        savings_percent: savings / highest * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetailerQuote;

    fn quote(retailer: &str, price: Option<f64>) -> RetailerQuote {
        RetailerQuote {
            retailer: Some(retailer.to_string()),
            price,
            ..Default::default()
        }
    }

    fn result(retailers: Vec<RetailerQuote>) -> PriceSearchResult {
        PriceSearchResult {
            product_name: "Sony Bravia 55".to_string(),
            search_date: "2026-10-16 10:00".to_string(),
            retailers,
            raw_response: String::new(),
            note: "estimate".to_string(),
        }
    }

    #[test]
    fn test_filters_sorts_and_summarizes() {
        let report = present(&result(vec![
            quote("Amazon India", Some(89999.0)),
            quote("Meesho", Some(0.0)),
            quote("Flipkart", Some(79999.0)),
            quote("Ajio", None),
            quote("Croma", Some(84999.0)),
        ]));

        let prices: Vec<f64> = report.quotes.iter().map(|q| q.price).collect();
        assert_eq!(prices, vec![79999.0, 84999.0, 89999.0]);

        let best = report.best_deal().unwrap();
        assert!(best.best_deal);
        assert_eq!(best.price, 79999.0);
        assert_eq!(best.quote.retailer.as_deref(), Some("Flipkart"));
        assert!(report.quotes[1..].iter().all(|q| !q.best_deal));
        assert_eq!(
            report.quotes.iter().map(|q| q.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let stats = report.analytics.unwrap();
        assert_eq!(stats.lowest, 79999.0);
        assert_eq!(stats.highest, 89999.0);
        assert_eq!(stats.average, 84999.0);
        assert_eq!(stats.savings, 10000.0);
        assert!((stats.savings_percent - 11.111).abs() < 0.01);
    }

    #[test]
    fn test_negative_prices_excluded() {
        let report = present(&result(vec![
            quote("A", Some(-5.0)),
            quote("B", Some(250.0)),
        ]));
        assert_eq!(report.quotes.len(), 1);
        assert_eq!(report.quotes[0].price, 250.0);
    }

    #[test]
    fn test_ties_keep_model_order() {
        let report = present(&result(vec![
            quote("Flipkart", Some(999.0)),
            quote("Amazon India", Some(999.0)),
        ]));
        assert_eq!(report.quotes[0].quote.retailer.as_deref(), Some("Flipkart"));
        assert_eq!(report.quotes[1].quote.retailer.as_deref(), Some("Amazon India"));
    }

    #[test]
    fn test_single_quote_has_zero_spread() {
        let report = present(&result(vec![quote("Snapdeal", Some(1499.0))]));
        let stats = report.analytics.unwrap();
        assert_eq!(stats.savings, 0.0);
        assert_eq!(stats.savings_percent, 0.0);
        assert_eq!(stats.average, 1499.0);
    }

    #[test]
    fn test_no_valid_prices() {
        let report = present(&result(vec![quote("A", None), quote("B", Some(0.0))]));
        assert!(report.quotes.is_empty());
        assert!(report.analytics.is_none());
        assert!(report.best_deal().is_none());
    }

    #[test]
    fn test_does_not_mutate_input() {
        let input = result(vec![quote("B", Some(2.0)), quote("A", Some(1.0))]);
        let _ = present(&input);
        assert_eq!(input.retailers[0].retailer.as_deref(), Some("B"));
    }
}
