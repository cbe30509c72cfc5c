//! V3XV0ID Player - Playback Session
//!
//! Platform-agnostic playback session management for the V3XV0ID player.
//!
//! This crate provides:
//! - One application-scoped [`PlaybackSession`] bound to the track catalog
//! - Random (autoplay) and sequential track advance with wraparound
//! - Remote-first playback with a one-time local fallback per track
//! - Bounded reload retries, then fail-over to another track
//! - A passive health check while playing
//! - Logarithmic volume control with mute
//! - Generation-tagged async completions, so a superseded switch can never
//!   mutate the current one
//!
//! # Architecture
//!
//! `vex-playback` does no I/O and never sleeps:
//! - The audio element is reached through the [`MediaElement`] trait
//! - Delays are emitted as [`TimerRequest`]s the host schedules
//! - Play results and element events are fed back in by the host
//! - UI updates are pulled with [`PlaybackSession::drain_events`]
//!
//! The `wasm` feature binds the session to an `HTMLAudioElement`.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use vex_core::{Catalog, LocalOnlyResolver};
//! use vex_playback::{
//!     Generation, MediaElement, PlayTicket, PlaybackSession, ReadyState, SessionConfig, Timer,
//!     TimerQueue,
//! };
//!
//! #[derive(Default)]
//! struct Element {
//!     source: Option<String>,
//!     requested: Vec<PlayTicket>,
//! }
//!
//! impl MediaElement for Element {
//!     fn load_source(&mut self, url: &str, _generation: Generation) {
//!         self.source = Some(url.to_string());
//!     }
//!     fn play(&mut self, ticket: PlayTicket) {
//!         self.requested.push(ticket);
//!     }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> Duration {
//!         Duration::ZERO
//!     }
//!     fn set_current_time(&mut self, _position: Duration) {}
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn ready_state(&self) -> ReadyState {
//!         ReadyState::HaveEnoughData
//!     }
//!     fn current_source(&self) -> Option<String> {
//!         self.source.clone()
//!     }
//! }
//!
//! let mut session = PlaybackSession::new(
//!     Catalog::builtin(),
//!     LocalOnlyResolver,
//!     Element::default(),
//!     SessionConfig::default(),
//! )
//! .unwrap()
//! .with_seed(7);
//!
//! let mut timers = TimerQueue::new();
//! session.start();
//! timers.schedule_all(session.drain_timers());
//!
//! // The autoplay attempt fires after one second
//! for timer in timers.advance(Duration::from_secs(1)) {
//!     session.fire_timer(timer);
//! }
//! let ticket = session.media_mut().requested.pop().unwrap();
//! session.play_settled(ticket, Ok(()));
//!
//! assert!(session.is_playing());
//! assert_eq!(timers.pop_next(), Some(Timer::HealthCheck));
//! ```

mod clock;
mod error;
mod events;
mod media;
mod recovery;
mod selection;
mod session;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use clock::{Timer, TimerQueue, TimerRequest};
pub use error::{PlayError, PlaybackError, Result};
pub use events::SessionEvent;
pub use media::{MediaElement, MediaEvent, ReadyState};
pub use recovery::{Health, RecoveryAction, RecoveryPolicy};
pub use selection::{following, preceding, random_other};
pub use session::{PlaybackSession, SessionSnapshot};
pub use types::{ConnectionStatus, Generation, PlayTicket, SessionConfig, SessionPhase};
pub use volume::Volume;
