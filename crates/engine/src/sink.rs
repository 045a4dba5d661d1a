//! Outbound collaborators.
//!
//! Both hooks default to doing nothing, so an implementor only overrides what
//! it consumes.

use sumfall_types::{EngineEvent, OutcomeSummary};

/// Presentation/effects hook. Notifications are fire-and-forget.
pub trait EffectsSink {
    fn notify(&mut self, _event: &EngineEvent) {}
}

/// Receives the final summary exactly once per finished game.
pub trait StatsSink {
    fn record_outcome(&mut self, _summary: &OutcomeSummary) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EffectsSink for NullSink {}
impl StatsSink for NullSink {}

/// Keeps everything it receives; useful for tests and replay tooling.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<EngineEvent>,
    pub outcomes: Vec<OutcomeSummary>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.outcomes.clear();
    }

    pub fn count_where(&self, pred: impl Fn(&EngineEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EffectsSink for RecordingSink {
    fn notify(&mut self, event: &EngineEvent) {
        self.events.push(*event);
    }
}

impl StatsSink for RecordingSink {
    fn record_outcome(&mut self, summary: &OutcomeSummary) {
        self.outcomes.push(*summary);
    }
}

impl<T: EffectsSink + ?Sized> EffectsSink for &mut T {
    fn notify(&mut self, event: &EngineEvent) {
        (**self).notify(event);
    }
}

impl<T: StatsSink + ?Sized> StatsSink for &mut T {
    fn record_outcome(&mut self, summary: &OutcomeSummary) {
        (**self).record_outcome(summary);
    }
}
