//! Per-controller construction outcomes, aggregated at init.
//!
//! Rather than catching failures after the fact, every controller's `bind`
//! returns an explicit result; the report collects them so the embedding can
//! see exactly which behaviors are live on this page and why the rest are
//! not. A disabled controller is an expected outcome on pages without the
//! relevant markup, not an error.

use pagewire_controllers::Disabled;

/// How one controller's construction went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Ready,
    Disabled(Disabled),
}

/// One line of the init report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerInit {
    pub name: &'static str,
    pub outcome: InitOutcome,
}

/// Aggregated construction outcomes for the whole registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    entries: Vec<ControllerInit>,
}

impl InitReport {
    /// Record a bind outcome, logging disabled controllers, and pass the
    /// live controller through.
    pub(crate) fn record<T>(
        &mut self,
        name: &'static str,
        result: Result<T, Disabled>,
    ) -> Option<T> {
        match result {
            Ok(controller) => {
                self.entries.push(ControllerInit {
                    name,
                    outcome: InitOutcome::Ready,
                });
                Some(controller)
            }
            Err(reason) => {
                tracing::warn!(controller = name, %reason, "controller disabled");
                self.entries.push(ControllerInit {
                    name,
                    outcome: InitOutcome::Disabled(reason),
                });
                None
            }
        }
    }

    #[must_use]
    pub fn is_ready(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.name == name && e.outcome == InitOutcome::Ready)
    }

    /// Why `name` is disabled, or `None` when it is ready or unknown.
    #[must_use]
    pub fn disabled_reason(&self, name: &str) -> Option<&Disabled> {
        self.entries.iter().find_map(|e| match &e.outcome {
            InitOutcome::Disabled(reason) if e.name == name => Some(reason),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControllerInit> {
        self.entries.iter()
    }

    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == InitOutcome::Ready)
            .count()
    }

    #[must_use]
    pub fn disabled_count(&self) -> usize {
        self.entries.len() - self.ready_count()
    }
}
