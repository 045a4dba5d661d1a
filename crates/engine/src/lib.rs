//! Session glue - time, scheduling and collaborators around the core.
//!
//! [`Session`] is the only stateful entry point: it owns the board and the
//! core components, turns clock time into fall/countdown ticks, accepts
//! player [`Command`](sumfall_types::Command)s and reports to injected sinks.
//!
//! ```
//! use sumfall_core::EngineConfig;
//! use sumfall_engine::{ManualClock, NullSink, RecordingSink, Session};
//! use sumfall_types::GameMode;
//!
//! let clock = ManualClock::new();
//! let mut session = Session::new(
//!     EngineConfig::default(),
//!     GameMode::Classic,
//!     clock.clone(),
//!     RecordingSink::new(),
//!     NullSink,
//! );
//!
//! clock.advance(500);
//! session.update();
//! assert_eq!(session.active().unwrap().position.row(), 1);
//! ```

pub mod clock;
pub mod scheduler;
pub mod session;
pub mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{Scheduler, TickKind};
pub use session::Session;
pub use sink::{EffectsSink, NullSink, RecordingSink, StatsSink};
