//! Human-readable rendering of identifications, price reports, and failures.
//!
//! Everything returns a `String` so callers decide where it goes: stdout for
//! results, stderr for failures.

use console::style;
use pricescout_core::{PipelineError, PriceReport, ProductIdentification};

/// Format rupees with thousands separators and no decimals, e.g. `₹89,999`.
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}₹{grouped}")
}

pub fn identification(id: &ProductIdentification) -> String {
    let label = |name: &str| style(format!("{name:<14}")).bold().to_string();

    let mut lines = vec![
        format!("{} Product identified", style("✓").green()),
        String::new(),
        format!("  {}{}", label("Name:"), id.product_name_or_unknown()),
        format!("  {}{}", label("Brand:"), id.brand_or_unknown()),
        format!("  {}{}", label("Category:"), id.category_or_unknown()),
        format!("  {}{}", label("Description:"), id.description_or_default()),
    ];
    if let Some(query) = id.search_query.as_deref().filter(|q| !q.trim().is_empty()) {
        lines.push(format!("  {}{}", label("Search query:"), query.trim()));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn report(report: &PriceReport) -> String {
    let mut lines = vec![
        style(format!("Price comparison for: {}", report.product_name))
            .bold()
            .to_string(),
        style(format!("Last updated: {}", report.search_date))
            .dim()
            .to_string(),
        String::new(),
    ];

    if report.quotes.is_empty() {
        lines.push(style("No valid prices found.").yellow().to_string());
        lines.push(String::new());
        lines.push(note(&report.note));
        return lines.join("\n");
    }

    let retailer_width = report
        .quotes
        .iter()
        .map(|q| q.quote.retailer_or_unknown().chars().count())
        .max()
        .unwrap_or(0)
        .max("Retailer".len());
    let price_width = report
        .quotes
        .iter()
        .map(|q| format_inr(q.price).chars().count())
        .max()
        .unwrap_or(0)
        .max("Price".len());

    lines.push(
        style(format!(
            "   {:>2}  {:<rw$}  {:>pw$}  {:<10}  {:<20}  {}",
            "#",
            "Retailer",
            "Price",
            "Condition",
            "Availability",
            "Offer",
            rw = retailer_width,
            pw = price_width,
        ))
        .bold()
        .to_string(),
    );

    for ranked in &report.quotes {
        let quote = &ranked.quote;
        let marker = if ranked.best_deal { "★" } else { " " };
        let price = format!("{:>pw$}", format_inr(ranked.price), pw = price_width);
        let price = if ranked.best_deal {
            style(price).green().bold().to_string()
        } else {
            price
        };

        lines.push(format!(
            " {} {:>2}  {:<rw$}  {}  {:<10}  {:<20}  {}",
            style(marker).green(),
            ranked.rank,
            quote.retailer_or_unknown(),
            price,
            quote.condition_or_default(),
            quote.availability_or_default(),
            quote.discount().unwrap_or("-"),
            rw = retailer_width,
        ));
    }

    if let Some(best) = report.best_deal() {
        lines.push(String::new());
        lines.push(format!(
            "{} Best deal: {} at {}",
            style("★").green(),
            style(best.quote.retailer_or_unknown()).bold(),
            style(format_inr(best.price)).green().bold()
        ));
    }

    let links: Vec<String> = report
        .quotes
        .iter()
        .filter_map(|q| {
            q.quote.url().map(|url| {
                format!(
                    "  {:<rw$}  {}",
                    q.quote.retailer_or_unknown(),
                    style(url).cyan(),
                    rw = retailer_width
                )
            })
        })
        .collect();
    if !links.is_empty() {
        lines.push(String::new());
        lines.push(style("Links").bold().to_string());
        lines.extend(links);
    }

    if let Some(stats) = &report.analytics {
        lines.push(String::new());
        lines.push(style("Price analytics").bold().to_string());
        lines.push(format!("  {:<20}{}", "Lowest price:", format_inr(stats.lowest)));
        lines.push(format!("  {:<20}{}", "Highest price:", format_inr(stats.highest)));
        lines.push(format!("  {:<20}{}", "Average price:", format_inr(stats.average)));
        lines.push(format!(
            "  {:<20}{} ({})",
            "Potential savings:",
            format_inr(stats.savings),
            style(format!("-{:.1}%", stats.savings_percent)).green()
        ));
    }

    lines.push(String::new());
    lines.push(note(&report.note));
    lines.join("\n")
}

/// Headline plus any raw text worth inspecting. Soft failures read as warnings.
pub fn failure(err: &PipelineError) -> String {
    let headline = if err.is_soft() {
        format!("{} {err}", style("⚠").yellow())
    } else {
        format!("{} {err}", style("✗").red())
    };

    let mut lines = vec![headline];
    lines.extend(detail(err));
    lines.join("\n")
}

/// Everything under the headline: a hint and the raw text, when present.
pub fn detail(err: &PipelineError) -> Option<String> {
    let lines: Vec<String> = hint(err)
        .map(|h| format!("  {h}"))
        .into_iter()
        .chain(raw_detail(err))
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// What the user can do about a failure, when that is clear from the error.
pub fn hint(err: &PipelineError) -> Option<&'static str> {
    match err {
        PipelineError::MissingQuery => {
            Some("Could not identify the product. Please try with a clearer image.")
        }
        PipelineError::Llm { source, .. } => match source.status_code()? {
            401 | 403 => Some("Check your API key with `pricescout config show`."),
            429 => Some("Rate limit reached. Wait a moment and try again."),
            500..=599 => Some("The model service is having trouble. Try again later."),
            _ => None,
        },
        _ => None,
    }
}

/// The raw model or HTTP text behind a failure, indented for display.
pub fn raw_detail(err: &PipelineError) -> Option<String> {
    let raw = err.raw_text()?.trim();
    if raw.is_empty() {
        return None;
    }

    let mut lines = vec![style("  Raw response:").dim().to_string()];
    lines.extend(raw.lines().map(|line| format!("    {}", style(line).dim())));
    Some(lines.join("\n"))
}

fn note(text: &str) -> String {
    format!("{} {}", style("Note:").yellow().bold(), style(text).dim())
}
