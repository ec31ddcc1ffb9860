/// Crawl phase definitions for the coordinator's state machine
///
/// A crawl moves strictly forward: `Init -> Running -> Draining -> Done`.
use crate::CrawlError;
use std::fmt;

/// The lifecycle phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Seed added to the frontier, nothing dispatched yet
    Init,

    /// Dispatching pages from the frontier
    Running,

    /// Page limit reached or frontier exhausted; awaiting in-flight fetches
    Draining,

    /// All fetches finished and the summary is available
    Done,
}

impl CrawlPhase {
    /// Returns the only phase this one may move to, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::Running),
            Self::Running => Some(Self::Draining),
            Self::Draining => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if moving from this phase to `to` is allowed
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Validates a transition, returning the new phase
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlPhase)` - The new phase
    /// * `Err(CrawlError::InvalidTransition)` - The transition skips or reverses a phase
    pub fn transition(self, to: Self) -> Result<Self, CrawlError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(CrawlError::InvalidTransition { from: self, to })
        }
    }

    /// Returns true once the crawl has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the lowercase name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
