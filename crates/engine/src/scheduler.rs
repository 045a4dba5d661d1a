//! Tick scheduling - fall and countdown deadlines
//!
//! Two independent periodic sources: the fall tick (interval follows the
//! level or the fast-fall override) and the countdown tick (timed modes
//! only). Deadlines advance by whole intervals when they fire, so a host that
//! polls late catches up without drift.
//!
//! While paused no deadline is reported. On resume the countdown keeps the
//! fraction of a second it had left; the fall tick is rescheduled by the
//! caller from the current interval.
//!
//! Also tracks active play time (wall time minus paused intervals).

/// Which source is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Fall,
    Countdown,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    fall_interval_ms: u64,
    next_fall_ms: Option<u64>,
    countdown_interval_ms: u64,
    next_countdown_ms: Option<u64>,
    started_ms: u64,
    paused_at_ms: Option<u64>,
    paused_total_ms: u64,
    stopped_at_ms: Option<u64>,
}

impl Scheduler {
    /// Start both sources at `now_ms`. `countdown_ms` is `None` for untimed modes.
    pub fn start(now_ms: u64, fall_interval_ms: u64, countdown_ms: Option<u64>) -> Self {
        let fall_interval_ms = fall_interval_ms.max(1);
        let countdown_interval_ms = countdown_ms.unwrap_or(0).max(1);
        Self {
            fall_interval_ms,
            next_fall_ms: Some(now_ms.saturating_add(fall_interval_ms)),
            countdown_interval_ms,
            next_countdown_ms: countdown_ms.map(|_| now_ms.saturating_add(countdown_interval_ms)),
            started_ms: now_ms,
            paused_at_ms: None,
            paused_total_ms: 0,
            stopped_at_ms: None,
        }
    }

    pub fn fall_interval_ms(&self) -> u64 {
        self.fall_interval_ms
    }

    pub fn next_fall_ms(&self) -> Option<u64> {
        self.next_fall_ms
    }

    pub fn next_countdown_ms(&self) -> Option<u64> {
        self.next_countdown_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_ms.is_some()
    }

    /// Restart the fall cadence at `now_ms` with a new interval.
    pub fn reschedule_fall(&mut self, now_ms: u64, interval_ms: u64) {
        if self.stopped_at_ms.is_some() {
            return;
        }
        self.fall_interval_ms = interval_ms.max(1);
        self.next_fall_ms = Some(now_ms.saturating_add(self.fall_interval_ms));
    }

    /// Earliest deadline at or before `now_ms`, with its scheduled time.
    ///
    /// Fall wins ties.
    pub fn next_due(&self, now_ms: u64) -> Option<(TickKind, u64)> {
        if self.is_paused() {
            return None;
        }
        let fall = self.next_fall_ms.filter(|t| *t <= now_ms);
        let countdown = self.next_countdown_ms.filter(|t| *t <= now_ms);
        match (fall, countdown) {
            (Some(f), Some(c)) if c < f => Some((TickKind::Countdown, c)),
            (Some(f), _) => Some((TickKind::Fall, f)),
            (None, Some(c)) => Some((TickKind::Countdown, c)),
            (None, None) => None,
        }
    }

    /// Mark `kind` as fired and move its deadline one interval on.
    pub fn complete(&mut self, kind: TickKind) {
        match kind {
            TickKind::Fall => {
                if let Some(t) = self.next_fall_ms.as_mut() {
                    *t = t.saturating_add(self.fall_interval_ms);
                }
            }
            TickKind::Countdown => {
                if let Some(t) = self.next_countdown_ms.as_mut() {
                    *t = t.saturating_add(self.countdown_interval_ms);
                }
            }
        }
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.paused_at_ms.is_none() && self.stopped_at_ms.is_none() {
            self.paused_at_ms = Some(now_ms);
        }
    }

    /// Leave the paused state, shifting the countdown by the pause length.
    pub fn resume(&mut self, now_ms: u64) {
        let Some(paused_at) = self.paused_at_ms.take() else {
            return;
        };
        let paused_for = now_ms.saturating_sub(paused_at);
        self.paused_total_ms = self.paused_total_ms.saturating_add(paused_for);
        if let Some(t) = self.next_countdown_ms.as_mut() {
            *t = t.saturating_add(paused_for);
        }
        if let Some(t) = self.next_fall_ms.as_mut() {
            *t = t.saturating_add(paused_for);
        }
    }

    /// Cancel both sources for good and freeze elapsed time.
    pub fn stop(&mut self, now_ms: u64) {
        if self.stopped_at_ms.is_some() {
            return;
        }
        self.resume(now_ms);
        self.next_fall_ms = None;
        self.next_countdown_ms = None;
        self.stopped_at_ms = Some(now_ms);
    }

    /// Active play time up to `now_ms` (or up to the stop time, if stopped)
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        let end = self.stopped_at_ms.unwrap_or(now_ms);
        let current_pause = self
            .paused_at_ms
            .map(|p| end.saturating_sub(p))
            .unwrap_or(0);
        end.saturating_sub(self.started_ms)
            .saturating_sub(self.paused_total_ms)
            .saturating_sub(current_pause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fall_only_without_countdown() {
        let s = Scheduler::start(0, 500, None);
        assert_eq!(s.next_due(499), None);
        assert_eq!(s.next_due(500), Some((TickKind::Fall, 500)));
        assert_eq!(s.next_countdown_ms(), None);
    }

    #[test]
    fn deadlines_in_order_with_catch_up() {
        let mut s = Scheduler::start(0, 400, Some(1_000));
        let mut fired = Vec::new();
        while let Some((kind, at)) = s.next_due(1_300) {
            fired.push((kind, at));
            s.complete(kind);
        }
        assert_eq!(
            fired,
            vec![
                (TickKind::Fall, 400),
                (TickKind::Fall, 800),
                (TickKind::Countdown, 1_000),
                (TickKind::Fall, 1_200),
            ]
        );
    }

    #[test]
    fn pause_suspends_and_shifts() {
        let mut s = Scheduler::start(0, 500, Some(1_000));
        s.pause(300);
        assert_eq!(s.next_due(10_000), None);
        s.resume(2_300);
        // Both deadlines slide by the 2000ms pause.
        assert_eq!(s.next_fall_ms(), Some(2_500));
        assert_eq!(s.next_countdown_ms(), Some(3_000));
        assert_eq!(s.elapsed_ms(2_500), 500);
    }

    #[test]
    fn reschedule_changes_cadence() {
        let mut s = Scheduler::start(0, 500, None);
        s.reschedule_fall(120, 50);
        assert_eq!(s.next_due(170), Some((TickKind::Fall, 170)));
        s.complete(TickKind::Fall);
        assert_eq!(s.next_fall_ms(), Some(220));
    }

    #[test]
    fn stop_freezes_elapsed() {
        let mut s = Scheduler::start(1_000, 500, Some(1_000));
        s.pause(1_500);
        s.stop(4_000);
        assert_eq!(s.next_due(u64::MAX), None);
        assert_eq!(s.elapsed_ms(9_999), 500);
        s.reschedule_fall(5_000, 100);
        assert_eq!(s.next_fall_ms(), None);
    }
}
