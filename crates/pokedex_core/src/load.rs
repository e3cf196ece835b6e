//! Screen load state
//!
//! Tracks one screen's list load: nothing, in flight, a full list, or a
//! failure with a retry prompt. A failure never keeps a partial list, and a
//! retry starts from scratch. Every load gets a ticket so a result from a
//! superseded fetch cannot overwrite a newer one.

use crate::entity::Pokemon;
use crate::error::{CoreError, Result};

/// Identifies one load attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What the list screen should show
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Pokemon>),
    /// Message for the retry prompt
    Failed(String),
}

/// Load state of a single screen
#[derive(Debug, Default)]
pub struct ScreenLoad {
    phase: LoadPhase,
    generation: u64,
}

impl ScreenLoad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    /// Start a load, dropping whatever was shown before
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        LoadTicket(self.generation)
    }

    /// Start over after a failure (or at any time)
    pub fn retry(&mut self) -> LoadTicket {
        tracing::debug!("Retrying catalog load");
        self.begin()
    }

    /// Apply a fetch result
    ///
    /// Returns `false` when the ticket is stale and the result was ignored.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Vec<Pokemon>>) -> bool {
        if ticket.0 != self.generation || self.phase != LoadPhase::Loading {
            tracing::debug!("Ignoring stale load result (ticket {})", ticket.0);
            return false;
        }
        self.phase = match result {
            Ok(list) => LoadPhase::Loaded(list),
            // A cancel is not shown as a failure; the screen simply goes quiet
            Err(CoreError::Cancelled) => LoadPhase::Idle,
            Err(e) => {
                tracing::warn!("Catalog load failed: {}", e);
                LoadPhase::Failed(e.to_string())
            }
        };
        true
    }

    /// Entities currently on screen (empty unless loaded)
    pub fn entities(&self) -> &[Pokemon] {
        match &self.phase {
            LoadPhase::Loaded(list) => list,
            _ => &[],
        }
    }

    /// Whether the retry prompt should be shown
    pub fn needs_retry(&self) -> bool {
        matches!(self.phase, LoadPhase::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PokemonType;

    fn one() -> Vec<Pokemon> {
        vec![Pokemon::new(1, "bulbasaur", [PokemonType::Grass], "", 7, 69, []).unwrap()]
    }

    #[test]
    fn test_load_success() {
        let mut load = ScreenLoad::new();
        let ticket = load.begin();
        assert_eq!(load.phase(), &LoadPhase::Loading);
        assert!(load.complete(ticket, Ok(one())));
        assert_eq!(load.entities().len(), 1);
    }

    #[test]
    fn test_failure_then_retry_starts_clean() {
        let mut load = ScreenLoad::new();
        let ticket = load.begin();
        load.complete(ticket, Err(CoreError::Fetch("timeout".into())));
        assert!(load.needs_retry());
        assert!(load.entities().is_empty());

        let retry = load.retry();
        assert_eq!(load.phase(), &LoadPhase::Loading);
        assert!(load.complete(retry, Ok(one())));
        assert!(!load.needs_retry());
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut load = ScreenLoad::new();
        let old = load.begin();
        let new = load.retry();
        assert!(!load.complete(old, Ok(one())));
        assert_eq!(load.phase(), &LoadPhase::Loading);
        assert!(load.complete(new, Err(CoreError::Cancelled)));
        assert_eq!(load.phase(), &LoadPhase::Idle);
    }
}
