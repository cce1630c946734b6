//! Interactive CLI mode, the guided experience for bare `pricescout`.
//!
//! The run owns one [`Session`]: the last identification and price result
//! stay available for redisplay until cleared or replaced. Every action's
//! errors are printed and the menu comes back.

pub mod lookup;
pub mod setup;
pub mod theme;

use console::Style;
use dialoguer::Select;
use pricescout_core::{Config, PipelineError, PriceFinder, Session};

use super::render;

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const MENU_ITEMS: &[&str] = &[
    "Identify a product from a photo",
    "Search prices by product name",
    "Show last results",
    "Clear results",
    "Configure API key",
    "Exit",
];

/// Entry point for interactive mode.
pub async fn run(mut config: Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::pricescout_theme();
    let mut session = Session::new();
    let mut finder: Option<PriceFinder> = None;

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        let outcome = match selection {
            Some(0) | Some(1) => match ensure_finder(&mut config, &mut finder) {
                Ok(Some(f)) if selection == Some(0) => {
                    lookup::photo(f, &mut session, &theme).await
                }
                Ok(Some(f)) => lookup::by_name(f, &mut session, &theme).await,
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            },
            Some(2) => {
                show_last(&session);
                Ok(())
            }
            Some(3) => {
                session.clear();
                let dim = Style::new().for_stderr().dim();
                eprintln!("  {}", dim.apply_to("Results cleared."));
                eprintln!();
                Ok(())
            }
            Some(4) => setup::configure_api_key(&mut config).map(|changed| {
                if changed {
                    finder = None;
                }
            }),
            Some(5) | None => break,
            _ => unreachable!(),
        };

        if let Err(e) = outcome {
            let err = Style::new().for_stderr().red();
            eprintln!("  {} {e:#}", err.apply_to("✗"));
            eprintln!();
        }
    }

    Ok(())
}

/// Build the finder on first use, asking for an API key if none is set.
///
/// `Ok(None)` means the user declined to provide a key.
fn ensure_finder<'a>(
    config: &mut Config,
    slot: &'a mut Option<PriceFinder>,
) -> anyhow::Result<Option<&'a PriceFinder>> {
    if slot.is_none() {
        match PriceFinder::from_config(config) {
            Ok(finder) => *slot = Some(finder),
            Err(e @ PipelineError::MissingCredential { .. }) => {
                let warn = Style::new().for_stderr().yellow();
                eprintln!("  {}", warn.apply_to(e.to_string()));
                if !setup::prompt_api_key(config)? {
                    return Ok(None);
                }
                *slot = Some(PriceFinder::from_config(config)?);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(slot.as_ref())
}

fn show_last(session: &Session) {
    let dim = Style::new().for_stderr().dim();

    if session.identification().is_none() && session.result().is_none() {
        eprintln!("  {}", dim.apply_to("No results yet."));
        eprintln!();
        return;
    }

    if let Some(identification) = session.identification() {
        println!("{}", render::identification(identification));
    }
    if let Some(report) = session.report() {
        println!("{}", render::report(&report));
        eprintln!();
    }
}
