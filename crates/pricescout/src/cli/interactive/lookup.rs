//! Guided lookups: photo → identification → prices, or name → prices.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use pricescout_core::pipeline::derive_query;
use pricescout_core::{PriceFinder, Session};
use std::path::PathBuf;

use crate::cli::{render, with_spinner};

/// Ask for a photo, identify the product, then compare prices.
pub async fn photo(
    finder: &PriceFinder,
    session: &mut Session,
    theme: &ColorfulTheme,
) -> anyhow::Result<()> {
    let Some(raw_path) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Path to product photo (jpg, png, webp)")
            .interact_text(),
    )?
    else {
        return Ok(());
    };
    let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());

    let image = match finder.load_image(&path).await {
        Ok(image) => image,
        Err(e) => {
            eprintln!("{}", render::failure(&e));
            eprintln!();
            return Ok(());
        }
    };

    let outcome = with_spinner(
        "Analyzing image with AI...",
        finder.identify_into(session, &image),
    )
    .await;
    let identification = match outcome {
        Ok(identification) => identification,
        Err(e) => {
            eprintln!("{}", render::failure(&e));
            eprintln!();
            return Ok(());
        }
    };
    println!("{}", render::identification(&identification));

    match derive_query(&identification) {
        Ok(query) => search(finder, session, &query).await,
        Err(e) => {
            eprintln!("{}", render::failure(&e));
            eprintln!();
        }
    }
    Ok(())
}

/// Ask for a product name and compare prices.
pub async fn by_name(
    finder: &PriceFinder,
    session: &mut Session,
    theme: &ColorfulTheme,
) -> anyhow::Result<()> {
    let Some(query) = super::handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Product name (e.g. Samsung Galaxy S23 Ultra)")
            .allow_empty(true)
            .interact_text(),
    )?
    else {
        return Ok(());
    };

    let query = query.trim();
    if query.is_empty() {
        let warn = Style::new().for_stderr().yellow();
        eprintln!("  {}", warn.apply_to("Please enter a product name"));
        eprintln!();
        return Ok(());
    }

    search(finder, session, query).await;
    Ok(())
}

async fn search(finder: &PriceFinder, session: &mut Session, query: &str) {
    let outcome = with_spinner(
        format!("Estimating prices for {query}..."),
        finder.run_query(session, query),
    )
    .await;

    match outcome {
        Ok(report) => println!("{}", render::report(&report)),
        Err(e) => eprintln!("{}", render::failure(&e)),
    }
    eprintln!();
}
