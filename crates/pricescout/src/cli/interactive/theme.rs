//! Dialoguer theme and banner for PriceScout interactive mode.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// `ColorfulTheme` with PriceScout's colours: cyan prompts, green success,
/// red errors. Everything renders to stderr.
pub fn pricescout_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().cyan(),
        active_item_style: Style::new().for_stderr().cyan(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Print the banner to stderr, with the disclaimer underneath.
pub fn print_banner() {
    let lines = [
        format!("PriceScout v{}", pricescout_core::VERSION),
        "Product prices across Indian retailers".to_string(),
    ];
    let inner_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;

    let cyan = Style::new().for_stderr().cyan();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!("{}", cyan.apply_to(format!("  ╔{:═<inner_width$}╗", "")));
    for line in &lines {
        eprintln!("{}", cyan.apply_to(format!("  ║{line:^inner_width$}║")));
    }
    eprintln!("{}", cyan.apply_to(format!("  ╚{:═<inner_width$}╝", "")));
    eprintln!(
        "  {}",
        dim.apply_to("Amazon India · Flipkart · Myntra · Ajio · Meesho · Snapdeal")
    );
    eprintln!("  {}", dim.apply_to(pricescout_core::pipeline::DISCLAIMER));
    eprintln!();
}
