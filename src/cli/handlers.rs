//! Decision handlers used by the CLI
//!
//! Decisions go to the JSONL decision log when one is configured and are
//! dropped otherwise. `--simulate-failure` wraps either in a handler that
//! fails for the named items, which exercises the "backend is down" path
//! without a backend.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::domain::{callbacks, DecisionHandler, ItemId, Verdict};
use crate::storage::DecisionLog;

/// Fails for selected items, delegating everything else
pub struct FailureSimulator<H> {
    inner: H,
    failing: HashSet<String>,
}

impl<H: DecisionHandler> FailureSimulator<H> {
    pub fn new(inner: H, failing: impl IntoIterator<Item = String>) -> Self {
        Self {
            inner,
            failing: failing.into_iter().collect(),
        }
    }

    fn check(&self, item_id: &ItemId) -> Result<()> {
        if self.failing.contains(item_id.as_str()) {
            anyhow::bail!("simulated backend failure for {}", item_id);
        }
        Ok(())
    }
}

impl<H: DecisionHandler> DecisionHandler for FailureSimulator<H> {
    fn on_affirm(&mut self, item_id: &ItemId) -> Result<()> {
        self.check(item_id)?;
        self.inner.on_affirm(item_id)
    }

    fn on_decline(&mut self, item_id: &ItemId) -> Result<()> {
        self.check(item_id)?;
        self.inner.on_decline(item_id)
    }
}

/// Builds the handler for a deck of kind `V`
pub fn build_handler<V: Verdict>(
    log: Option<PathBuf>,
    simulate_failure: &[String],
) -> Box<dyn DecisionHandler> {
    let base: Box<dyn DecisionHandler> = match log {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Recording decisions");
            Box::new(DecisionLog::new(path).handler::<V>())
        }
        None => Box::new(callbacks(|_: &ItemId| Ok(()), |_: &ItemId| Ok(()))),
    };

    if simulate_failure.is_empty() {
        base
    } else {
        Box::new(FailureSimulator::new(base, simulate_failure.iter().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InviteVerdict;
    use tempfile::TempDir;

    #[test]
    fn simulator_fails_only_named_items() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let mut handler = build_handler::<InviteVerdict>(Some(path.clone()), &["B".to_string()]);

        assert!(handler.on_affirm(&"A".parse().unwrap()).is_ok());
        let err = handler.on_decline(&"B".parse().unwrap()).unwrap_err();
        assert!(err.to_string().contains("simulated"));

        let records = DecisionLog::new(path).read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_id.as_str(), "A");
    }

    #[test]
    fn null_handler_accepts_everything() {
        let mut handler = build_handler::<InviteVerdict>(None, &[]);
        assert!(handler.on_affirm(&"A".parse().unwrap()).is_ok());
        assert!(handler.on_decline(&"A".parse().unwrap()).is_ok());
    }
}
