//! Requests and stage outputs passed between the spider and the coordinator

use crate::output::Record;
use crate::state::{Stage, StageKind};
use url::Url;

/// A pending fetch: where to go, which stage handles the page, and whether
/// the page needs JavaScript rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: Url,
    pub stage: Stage,
    pub render: bool,
}

impl Request {
    pub fn new(url: Url, stage: Stage) -> Self {
        Self {
            url,
            stage,
            render: false,
        }
    }

    /// A request whose page is fetched through the render service
    pub fn rendered(url: Url, stage: Stage) -> Self {
        Self {
            url,
            stage,
            render: true,
        }
    }

    pub fn kind(&self) -> StageKind {
        self.stage.kind()
    }
}

/// One result of handling a fetched page
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    /// A follow-up request to schedule
    Follow(Request),

    /// A finished record for the emitter
    Emit(Record),
}
