//! Caller-owned session state for one interactive run.
//!
//! Holds the last identification and the last price result so they can be
//! redisplayed, plus where the pipeline currently is. Each successful action
//! overwrites what it produced; `clear` resets everything.

use std::fmt;

use crate::pipeline::present;
use crate::types::{PriceReport, PriceSearchResult, ProductIdentification};

/// Where the pipeline is within the current user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Identifying,
    Identified,
    PricingQuery,
    Priced,
    Displayed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Identifying => "identifying",
            PipelineState::Identified => "identified",
            PipelineState::PricingQuery => "pricing",
            PipelineState::Priced => "priced",
            PipelineState::Displayed => "displayed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: PipelineState,
    identification: Option<ProductIdentification>,
    result: Option<PriceSearchResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn identification(&self) -> Option<&ProductIdentification> {
        self.identification.as_ref()
    }

    pub fn result(&self) -> Option<&PriceSearchResult> {
        self.result.as_ref()
    }

    /// Presented view of the held result, if any.
    pub fn report(&self) -> Option<PriceReport> {
        self.result.as_ref().map(present)
    }

    /// Forget the held identification and result.
    pub fn clear(&mut self) {
        self.identification = None;
        self.result = None;
        self.state = PipelineState::Idle;
    }

    pub(crate) fn advance(&mut self, next: PipelineState) {
        tracing::debug!(from = %self.state, to = %next, "Pipeline state");
        self.state = next;
    }

    /// Abort the current action. Held data from earlier actions is kept.
    pub(crate) fn abort(&mut self) {
        self.advance(PipelineState::Idle);
    }

    pub(crate) fn set_identification(&mut self, identification: ProductIdentification) {
        self.identification = Some(identification);
        self.advance(PipelineState::Identified);
    }

    pub(crate) fn set_result(&mut self, result: PriceSearchResult) {
        self.result = Some(result);
        self.advance(PipelineState::Priced);
    }

    pub(crate) fn mark_displayed(&mut self) {
        self.advance(PipelineState::Displayed);
    }
}
