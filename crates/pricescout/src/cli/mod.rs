//! Command implementations for the `pricescout` binary.

pub mod config;
pub mod identify;
pub mod interactive;
pub mod output;
pub mod render;
pub mod search;

use indicatif::{ProgressBar, ProgressStyle};
use pricescout_core::{PipelineError, PipelineResult};
use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

/// Await `fut` behind a stderr spinner.
pub(crate) async fn with_spinner<F: Future>(
    message: impl Into<Cow<'static, str>>,
    fut: F,
) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}

/// Settle a pipeline outcome at the command boundary.
///
/// Soft failures print as warnings and yield `None`. Hard failures print any
/// hint and raw model text to stderr and propagate.
pub(crate) fn settle<T>(outcome: PipelineResult<T>) -> anyhow::Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_soft() => {
            eprintln!("{}", render::failure(&e));
            Ok(None)
        }
        Err(e) => Err(fail(e)),
    }
}

/// Print the detail behind a hard failure; the headline is left to `main`.
pub(crate) fn fail(err: PipelineError) -> anyhow::Error {
    if let Some(detail) = render::detail(&err) {
        eprintln!("{detail}");
    }
    err.into()
}
