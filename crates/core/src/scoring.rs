//! Scoring module - combo, points, level and target progression
//!
//! Rules:
//! - Every productive cascade pass is one clear: the combo count goes up by
//!   one and the multiplier becomes `min(combo, 5)`.
//! - Points are `lines * 100 * multiplier`, then scaled by the mode's ratio
//!   (3/2 in time attack), truncating toward zero.
//! - After each clear the level advances by one if `score >= level * 500`; the
//!   target then moves per the mode's [`TargetRule`].
//! - The combo decays to `(0, 1)` once more than the timeout passes without a clear.
//!
//! A multiplier power-up doubles the live multiplier until the combo is next
//! settled: the next clear recomputes it, and a fruitless tick puts it back to
//! `min(combo, 5)` (or 1 with no live combo). Once a tick has been settled the
//! multiplier equals `clamp(combo, 1, 5)`.

use crate::rng::SimpleRng;
use crate::types::{
    GameMode, ModeSettings, PowerUpKind, PowerUpUsage, TargetRule, LEVEL_SCORE_STEP,
    MAX_COMBO_MULTIPLIER, POINTS_PER_LINE,
};

/// Level-up produced by a clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub target: u32,
}

/// What a single clear was worth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearAward {
    pub lines: u32,
    pub points: u32,
    pub combo_count: u32,
    pub multiplier: u32,
    pub level_up: Option<LevelUp>,
}

/// Points for `lines` cleared runs at `multiplier`, scaled by the mode ratio.
pub fn points_for_clear(lines: u32, multiplier: u32, settings: &ModeSettings) -> u32 {
    let raw = u64::from(lines) * u64::from(POINTS_PER_LINE) * u64::from(multiplier);
    let scaled =
        raw * u64::from(settings.points_numerator) / u64::from(settings.points_denominator.max(1));
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Score needed to leave `level`
pub fn level_threshold(level: u32) -> u32 {
    level.saturating_mul(LEVEL_SCORE_STEP)
}

/// Next target after a level-up. Never lower than `current`.
pub fn next_target(rule: TargetRule, current: u32, rng: &mut SimpleRng) -> u32 {
    match rule {
        TargetRule::Escalate { step, max } => current.saturating_add(step).min(max).max(current),
        TargetRule::Reroll { spread, max } => {
            let hi = current.saturating_add(spread).min(max);
            rng.next_inclusive(current, hi).max(current)
        }
        TargetRule::Pinned => current,
    }
}

/// Combo and progression state for one session
#[derive(Debug, Clone)]
pub struct Scoring {
    mode: GameMode,
    settings: ModeSettings,
    combo_timeout_ms: u64,
    score: u32,
    level: u32,
    target: u32,
    combo_count: u32,
    combo_multiplier: u32,
    last_clear_ms: Option<u64>,
    max_combo: u32,
    max_level: u32,
    power_ups: PowerUpUsage,
}

impl Scoring {
    pub fn new(mode: GameMode, combo_timeout_ms: u64) -> Self {
        let settings = mode.settings();
        Self {
            mode,
            settings,
            combo_timeout_ms,
            score: 0,
            level: 1,
            target: settings.initial_target,
            combo_count: 0,
            combo_multiplier: 1,
            last_clear_ms: None,
            max_combo: 0,
            max_level: 1,
            power_ups: PowerUpUsage::default(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn combo_multiplier(&self) -> u32 {
        self.combo_multiplier
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn power_ups(&self) -> PowerUpUsage {
        self.power_ups
    }

    pub fn last_clear_ms(&self) -> Option<u64> {
        self.last_clear_ms
    }

    /// Register one cascade pass that cleared `lines` runs at time `now_ms`.
    ///
    /// Returns `None` (and changes nothing) when `lines == 0`.
    pub fn on_lines_cleared(
        &mut self,
        lines: u32,
        now_ms: u64,
        rng: &mut SimpleRng,
    ) -> Option<ClearAward> {
        if lines == 0 {
            return None;
        }

        self.combo_count = self.combo_count.saturating_add(1);
        self.max_combo = self.max_combo.max(self.combo_count);
        self.combo_multiplier = self.combo_count.min(MAX_COMBO_MULTIPLIER);
        self.last_clear_ms = Some(now_ms);

        let points = points_for_clear(lines, self.combo_multiplier, &self.settings);
        self.score = self.score.saturating_add(points);

        let level_up = self.check_level_up(rng);

        Some(ClearAward {
            lines,
            points,
            combo_count: self.combo_count,
            multiplier: self.combo_multiplier,
            level_up,
        })
    }

    fn check_level_up(&mut self, rng: &mut SimpleRng) -> Option<LevelUp> {
        if self.score < level_threshold(self.level) {
            return None;
        }

        self.level += 1;
        self.max_level = self.max_level.max(self.level);
        self.target = next_target(self.settings.target_rule, self.target, rng);
        log::debug!("level {} reached, target {}", self.level, self.target);
        Some(LevelUp {
            level: self.level,
            target: self.target,
        })
    }

    /// Settle the combo on a tick that cleared nothing.
    ///
    /// A live combo resets to `(0, 1)` once more than the timeout has passed
    /// since the last clear; before that the multiplier is put back to
    /// `min(combo, 5)`. With no live combo the multiplier is 1.
    ///
    /// Returns `true` when a live combo was reset.
    pub fn expire_combo(&mut self, now_ms: u64) -> bool {
        let timed_out = self
            .last_clear_ms
            .map_or(true, |last| now_ms.saturating_sub(last) > self.combo_timeout_ms);

        if self.combo_count > 0 && !timed_out {
            self.combo_multiplier = self.combo_count.min(MAX_COMBO_MULTIPLIER);
            return false;
        }

        let was_live = self.combo_count > 0;
        if was_live {
            log::trace!("combo {} expired", self.combo_count);
        }
        self.combo_count = 0;
        self.combo_multiplier = 1;
        was_live
    }

    /// Multiplier power-up: double the live multiplier until the combo is next settled.
    pub fn double_multiplier(&mut self) {
        self.combo_multiplier = self.combo_multiplier.saturating_mul(2);
    }

    /// Add power-up bonus points. No level check happens here.
    pub fn add_bonus(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn record_power_up(&mut self, kind: PowerUpKind) {
        self.power_ups.record(kind);
    }
}
