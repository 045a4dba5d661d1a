//! Game session - drives the core components from two tick sources
//!
//! One fall tick:
//! 1. step the active piece; if it landed, write it into the board
//! 2. resolve a power-up tile (its cell is consumed first)
//! 3. run matcher passes until one clears nothing, scoring each pass
//! 4. spawn the lookahead; a blocked spawn cell ends the game
//!
//! Ticks where nothing was cleared also check the combo timeout.
//!
//! The session owns all mutable state. Collaborators are injected: a
//! [`Clock`] for time, an [`EffectsSink`] for notifications and a
//! [`StatsSink`] for the final summary.

use sumfall_core::board::Board;
use sumfall_core::config::EngineConfig;
use sumfall_core::matcher;
use sumfall_core::piece::{FallingPiece, PieceController, SpawnOutcome, StepOutcome};
use sumfall_core::powerup;
use sumfall_core::scoring::Scoring;
use sumfall_core::snapshot::{ActiveSnapshot, SessionSnapshot};
use sumfall_types::{
    Cell, Command, EngineEvent, GameMode, OutcomeSummary, PowerUpUsage, Tile,
};

use crate::clock::Clock;
use crate::scheduler::{Scheduler, TickKind};
use crate::sink::{EffectsSink, StatsSink};

pub struct Session<C: Clock, E: EffectsSink, S: StatsSink> {
    config: EngineConfig,
    clock: C,
    effects: E,
    stats: S,
    board: Board,
    pieces: PieceController,
    scoring: Scoring,
    scheduler: Scheduler,
    remaining_secs: Option<u32>,
    paused: bool,
    game_over: bool,
    mistakes: u32,
    outcome: Option<OutcomeSummary>,
}

impl<C: Clock, E: EffectsSink, S: StatsSink> Session<C, E, S> {
    /// Create a session and start a game in `mode`.
    pub fn new(config: EngineConfig, mode: GameMode, clock: C, effects: E, stats: S) -> Self {
        let pieces = PieceController::new(&config);
        Self::start(config, mode, clock, effects, stats, pieces)
    }

    /// Like [`Session::new`], but the first tiles come from `tiles` (the
    /// first one is the first active piece, the second its lookahead).
    pub fn with_tiles(
        config: EngineConfig,
        mode: GameMode,
        clock: C,
        effects: E,
        stats: S,
        tiles: impl IntoIterator<Item = Tile>,
    ) -> Self {
        let pieces = PieceController::with_sequence(&config, tiles);
        Self::start(config, mode, clock, effects, stats, pieces)
    }

    fn start(
        config: EngineConfig,
        mode: GameMode,
        clock: C,
        effects: E,
        stats: S,
        pieces: PieceController,
    ) -> Self {
        let now = clock.now_ms();
        let mut session = Self {
            config,
            clock,
            effects,
            stats,
            board: Board::new(),
            pieces,
            scoring: Scoring::new(mode, config.combo_timeout_ms),
            scheduler: Scheduler::start(now, config.fall_interval_ms(1), None),
            remaining_secs: None,
            paused: false,
            game_over: false,
            mistakes: 0,
            outcome: None,
        };
        session.begin(mode, now);
        session
    }

    /// Start a fresh game in `mode`. Always allowed, including mid-game and after game over.
    ///
    /// The tile source continues from where the previous game left it.
    pub fn reset_game(&mut self, mode: GameMode) {
        let now = self.clock.now_ms();
        self.begin(mode, now);
    }

    fn begin(&mut self, mode: GameMode, now: u64) {
        let settings = mode.settings();
        self.board.reset();
        self.scoring = Scoring::new(mode, self.config.combo_timeout_ms);
        self.remaining_secs = settings.time_limit_secs;
        self.paused = false;
        self.game_over = false;
        self.mistakes = 0;
        self.outcome = None;
        self.scheduler = Scheduler::start(
            now,
            self.config.fall_interval_ms(self.scoring.level()),
            settings
                .time_limit_secs
                .map(|_| self.config.countdown_interval_ms),
        );

        log::info!(
            "starting {} game (target {}, time limit {:?})",
            mode,
            settings.initial_target,
            settings.time_limit_secs
        );

        if self.pieces.spawn(&self.board, self.scoring.level()) == SpawnOutcome::Blocked {
            self.end_game(now);
        }
    }

    /// Run every fall and countdown tick that is due by the clock's current time.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        while !self.game_over {
            let Some((kind, at)) = self.scheduler.next_due(now) else {
                break;
            };
            self.scheduler.complete(kind);
            match kind {
                TickKind::Fall => self.fall_tick_at(at),
                TickKind::Countdown => self.countdown_tick_at(at),
            }
        }
    }

    /// Apply one fall tick now, outside the scheduler's cadence.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.fall_tick_at(now);
    }

    /// Apply one countdown tick now. No-op in untimed modes.
    pub fn countdown_tick(&mut self) {
        let now = self.clock.now_ms();
        self.countdown_tick_at(now);
    }

    fn fall_tick_at(&mut self, now: u64) {
        if self.paused || self.game_over {
            return;
        }

        match self.pieces.step(&self.board) {
            StepOutcome::Fell => {
                if let Some(piece) = self.pieces.active() {
                    log::trace!("piece fell to {}", piece.position);
                }
                self.scoring.expire_combo(now);
            }
            StepOutcome::Landed => self.lock_piece(now),
            StepOutcome::Idle => {}
        }
    }

    fn countdown_tick_at(&mut self, now: u64) {
        if self.paused || self.game_over {
            return;
        }
        let Some(remaining) = self.remaining_secs.as_mut() else {
            return;
        };

        *remaining = remaining.saturating_sub(1);
        log::trace!("{}s remaining", remaining);
        if *remaining == 0 {
            self.end_game(now);
        }
    }

    fn lock_piece(&mut self, now: u64) {
        let Some(FallingPiece { tile, position }) = self.pieces.take_for_lock() else {
            return;
        };
        self.board.set(position, Cell::from(tile));
        log::debug!("locked {:?} at {}", tile, position);

        if let Tile::PowerUp(kind) = tile {
            let effect = powerup::apply(
                kind,
                position,
                &mut self.board,
                &mut self.scoring,
                self.pieces.rng_mut(),
            );
            self.effects.notify(&EngineEvent::PowerUpActivated {
                kind,
                position,
                score_delta: effect.score_delta,
            });
        }

        let level_before = self.scoring.level();
        let mut total_cleared = 0;
        loop {
            let pass = matcher::scan_and_clear(&mut self.board, self.scoring.target());
            let Some(award) =
                self.scoring
                    .on_lines_cleared(pass.cleared_lines, now, self.pieces.rng_mut())
            else {
                break;
            };
            total_cleared += award.lines;

            self.effects.notify(&EngineEvent::LineClear {
                lines: award.lines,
                score_delta: award.points,
            });
            if award.combo_count > 1 {
                self.effects.notify(&EngineEvent::Combo {
                    count: award.combo_count,
                    multiplier: award.multiplier,
                });
            }
            if let Some(level_up) = award.level_up {
                self.effects.notify(&EngineEvent::LevelUp {
                    level: level_up.level,
                    target: level_up.target,
                });
            }
        }

        if total_cleared == 0 {
            self.scoring.expire_combo(now);
            if !tile.is_power_up() && position.row() < self.config.danger_rows {
                self.mistakes += 1;
                log::debug!("mistake #{} at {}", self.mistakes, position);
            }
        } else {
            log::debug!(
                "cascade cleared {} run(s), score {}",
                total_cleared,
                self.scoring.score()
            );
        }
        if self.scoring.level() != level_before {
            log::debug!(
                "fall interval now {}ms",
                self.config.fall_interval_ms(self.scoring.level())
            );
        }

        match self.pieces.spawn(&self.board, self.scoring.level()) {
            SpawnOutcome::Spawned => {
                let interval = self.fall_interval_ms();
                self.scheduler.reschedule_fall(now, interval);
            }
            SpawnOutcome::Blocked => self.end_game(now),
        }
    }

    /// Apply a player command. Returns whether anything changed.
    ///
    /// Everything except `TogglePause` is ignored while paused; everything is
    /// ignored after game over.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.game_over {
            return false;
        }
        if command == Command::TogglePause {
            self.toggle_pause();
            return true;
        }
        if self.paused {
            return false;
        }

        match command {
            Command::MoveLeft => self.pieces.move_left(&self.board),
            Command::MoveRight => self.pieces.move_right(&self.board),
            Command::Rotate => self.pieces.rotate(),
            Command::ToggleFastFall => {
                if self.pieces.active().is_none() {
                    return false;
                }
                self.pieces.toggle_fast_fall();
                let now = self.clock.now_ms();
                let interval = self.fall_interval_ms();
                self.scheduler.reschedule_fall(now, interval);
                true
            }
            Command::TogglePause => false,
        }
    }

    fn toggle_pause(&mut self) {
        let now = self.clock.now_ms();
        self.paused = !self.paused;
        if self.paused {
            self.scheduler.pause(now);
        } else {
            self.scheduler.resume(now);
            let interval = self.fall_interval_ms();
            self.scheduler.reschedule_fall(now, interval);
        }
        log::debug!("paused: {}", self.paused);
    }

    fn end_game(&mut self, now: u64) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.scheduler.stop(now);

        let summary = self.summary(now);
        log::info!(
            "game over: {} scored {} (level {}, max combo {}, {} mistake(s))",
            summary.mode,
            summary.final_score,
            summary.max_level,
            summary.max_combo,
            summary.mistakes
        );
        self.effects.notify(&EngineEvent::GameOver(summary));
        self.stats.record_outcome(&summary);
        self.outcome = Some(summary);
    }

    fn summary(&self, now: u64) -> OutcomeSummary {
        OutcomeSummary {
            mode: self.scoring.mode(),
            final_score: self.scoring.score(),
            max_combo: self.scoring.max_combo(),
            max_level: self.scoring.max_level(),
            power_ups: self.scoring.power_ups(),
            elapsed_ms: self.scheduler.elapsed_ms(now),
            mistakes: self.mistakes,
            perfect_game: self.mistakes == 0 && self.scoring.score() > 0,
        }
    }

    /// Current fall interval: the level's tier, or the fast-fall override.
    pub fn fall_interval_ms(&self) -> u64 {
        if self.pieces.fast_fall() {
            self.config.fast_fall_interval_ms
        } else {
            self.config.fall_interval_ms(self.scoring.level())
        }
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.board.write_values(&mut out.board);
        out.mode = self.scoring.mode();
        out.active = self.pieces.active().map(ActiveSnapshot::from);
        out.lookahead = self.pieces.lookahead();
        out.score = self.scoring.score();
        out.level = self.scoring.level();
        out.target = self.scoring.target();
        out.combo_count = self.scoring.combo_count();
        out.combo_multiplier = self.scoring.combo_multiplier();
        out.fall_interval_ms = self.fall_interval_ms();
        out.fast_fall = self.pieces.fast_fall();
        out.remaining_secs = self.remaining_secs;
        out.elapsed_ms = self.elapsed_ms();
        out.mistakes = self.mistakes;
        out.power_ups = self.scoring.power_ups();
        out.paused = self.paused;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snap = SessionSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    pub fn mode(&self) -> GameMode {
        self.scoring.mode()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board (scenario setup)
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<FallingPiece> {
        self.pieces.active()
    }

    pub fn lookahead(&self) -> Tile {
        self.pieces.lookahead()
    }

    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    pub fn level(&self) -> u32 {
        self.scoring.level()
    }

    pub fn target(&self) -> u32 {
        self.scoring.target()
    }

    pub fn combo_count(&self) -> u32 {
        self.scoring.combo_count()
    }

    pub fn combo_multiplier(&self) -> u32 {
        self.scoring.combo_multiplier()
    }

    pub fn remaining_secs(&self) -> Option<u32> {
        self.remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn power_ups(&self) -> PowerUpUsage {
        self.scoring.power_ups()
    }

    /// Active play time so far (pauses excluded)
    pub fn elapsed_ms(&self) -> u64 {
        self.scheduler.elapsed_ms(self.clock.now_ms())
    }

    /// The summary produced at game over, if the game has ended
    pub fn outcome(&self) -> Option<&OutcomeSummary> {
        self.outcome.as_ref()
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
