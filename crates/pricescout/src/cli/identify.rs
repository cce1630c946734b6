//! The `pricescout identify` command: photo → product → prices.

use clap::Args;
use pricescout_core::pipeline::derive_query;
use pricescout_core::{Config, PriceFinder, ProductIdentification, Session};
use std::path::PathBuf;

use super::output::{OutputArgs, ResultSink};
use super::{fail, settle, with_spinner};

/// Arguments for the `identify` command.
#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Product photo (jpg, jpeg, png, webp)
    pub image: PathBuf,

    /// Stop after identifying the product
    #[arg(long)]
    pub no_prices: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the identify command.
pub async fn execute(args: IdentifyArgs, config: &Config) -> anyhow::Result<()> {
    let finder = PriceFinder::from_config(config)?;
    let mut session = Session::new();

    let image = finder.load_image(&args.image).await?;
    let outcome = with_spinner(
        "Identifying product...",
        finder.identify_into(&mut session, &image),
    )
    .await;
    let Some(identification) = settle(outcome)? else {
        return Ok(());
    };

    let mut sink = ResultSink::open(&args.output)?;
    sink.identification(&identification)?;

    if !args.no_prices {
        let query = price_query(&identification, &mut sink)?;

        let outcome = with_spinner(
            format!("Estimating prices for {query}..."),
            finder.run_query(&mut session, &query),
        )
        .await;
        if let Some(report) = settle(outcome)? {
            sink.report(&report)?;
        }
    }

    sink.finish()?;
    Ok(())
}

/// Derive the price query. Without one, finish the output written so far
/// before reporting the failure.
fn price_query(
    identification: &ProductIdentification,
    sink: &mut ResultSink,
) -> anyhow::Result<String> {
    match derive_query(identification) {
        Ok(query) => Ok(query),
        Err(e) => {
            sink.finish()?;
            Err(fail(e))
        }
    }
}
