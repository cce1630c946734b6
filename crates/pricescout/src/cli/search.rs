//! The `pricescout search` command: price comparison by product name.

use clap::Args;
use pricescout_core::{Config, PriceFinder, Session};

use super::output::{OutputArgs, ResultSink};
use super::{settle, with_spinner};

/// Arguments for the `search` command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Product name, e.g. `Samsung Galaxy S23 Ultra`
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl SearchArgs {
    /// The query as typed, words joined by single spaces.
    pub fn query(&self) -> String {
        self.words.join(" ").trim().to_string()
    }
}

/// Execute the search command.
pub async fn execute(args: SearchArgs, config: &Config) -> anyhow::Result<()> {
    let query = args.query();
    if query.is_empty() {
        anyhow::bail!("Please enter a product name");
    }

    let finder = PriceFinder::from_config(config)?;
    let mut session = Session::new();

    let outcome = with_spinner(
        format!("Estimating prices for {query}..."),
        finder.run_query(&mut session, &query),
    )
    .await;

    let mut sink = ResultSink::open(&args.output)?;
    if let Some(report) = settle(outcome)? {
        sink.report(&report)?;
    }
    sink.finish()?;
    Ok(())
}
