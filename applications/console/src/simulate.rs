//! Offline playback simulation
//!
//! Drives a [`PlaybackSession`] against an in-memory element whose play
//! requests and media events fail at a configurable rate, on a virtual clock.
//! Nothing sleeps; a thousand steps finish instantly.

use crate::error::{ConsoleError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use vex_core::{Catalog, SourceResolver};
use vex_playback::{
    Generation, MediaElement, MediaEvent, PlayError, PlayTicket, PlaybackSession, ReadyState,
    SessionConfig, SessionEvent, SessionSnapshot, TimerQueue,
};

/// Virtual time covered by one step when no timer is due sooner
pub const STEP: Duration = Duration::from_millis(500);

/// Chance per playing step that the track ends
const ENDED_RATE: f64 = 0.02;

/// Default chance per step of a simulated click (half toggle, half next)
pub const USER_ACTION_RATE: f64 = 0.02;

/// In-memory media element
#[derive(Debug)]
pub struct SimulatedMedia {
    source: Option<String>,
    generation: Generation,
    pending: Vec<PlayTicket>,
    position: Duration,
    playing: bool,
    starved: bool,
    volume: f32,
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self {
            source: None,
            generation: Generation::INITIAL,
            pending: Vec::new(),
            position: Duration::ZERO,
            playing: false,
            starved: false,
            volume: 1.0,
        }
    }
}

impl SimulatedMedia {
    /// Play requests not yet settled
    pub fn take_pending(&mut self) -> Vec<PlayTicket> {
        std::mem::take(&mut self.pending)
    }

    /// Generation of the loaded source, as the element's listeners see it
    pub fn loaded_generation(&self) -> Generation {
        self.generation
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn tick(&mut self, dt: Duration) {
        if self.playing && !self.starved {
            self.position += dt;
        }
    }
}

impl MediaElement for SimulatedMedia {
    fn load_source(&mut self, url: &str, generation: Generation) {
        self.source = Some(url.to_string());
        self.generation = generation;
        self.position = Duration::ZERO;
        self.playing = false;
        self.starved = false;
    }

    fn play(&mut self, ticket: PlayTicket) {
        self.pending.push(ticket);
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn current_time(&self) -> Duration {
        self.position
    }

    fn set_current_time(&mut self, position: Duration) {
        self.position = position;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn ready_state(&self) -> ReadyState {
        if self.starved {
            ReadyState::HaveCurrentData
        } else {
            ReadyState::HaveEnoughData
        }
    }

    fn current_source(&self) -> Option<String> {
        self.source.clone()
    }
}

/// Counters collected over a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    pub steps: usize,
    pub elapsed_ms: u64,
    pub track_changes: usize,
    pub fallbacks: usize,
    pub retries: usize,
    pub failovers: usize,
    pub plays_confirmed: usize,
    pub play_failures: usize,
    pub injected_faults: usize,
    pub final_state: Option<SessionSnapshot>,
}

pub struct Simulation {
    session: PlaybackSession<SimulatedMedia>,
    timers: TimerQueue,
    rng: StdRng,
    fault_rate: f64,
    user_action_rate: f64,
    report: SimulationReport,
}

impl Simulation {
    pub fn new(
        catalog: Catalog,
        resolver: impl SourceResolver + 'static,
        config: SessionConfig,
        seed: u64,
        fault_rate: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&fault_rate) {
            return Err(ConsoleError::Config(format!(
                "fault rate must be between 0 and 1, got {fault_rate}"
            )));
        }

        let session =
            PlaybackSession::new(catalog, resolver, SimulatedMedia::default(), config)?
                .with_seed(seed);

        Ok(Self {
            session,
            timers: TimerQueue::new(),
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            fault_rate,
            user_action_rate: USER_ACTION_RATE,
            report: SimulationReport::default(),
        })
    }

    /// Override how often a simulated listener clicks; `0.0` disables clicks
    #[must_use]
    pub fn with_user_action_rate(mut self, rate: f64) -> Self {
        self.user_action_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn session(&self) -> &PlaybackSession<SimulatedMedia> {
        &self.session
    }

    /// Virtual time elapsed
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Start the session and run `steps` steps
    pub fn run(mut self, steps: usize) -> SimulationReport {
        info!(
            track = %self.session.current_track().id,
            fault_rate = self.fault_rate,
            steps,
            "Starting simulation"
        );

        self.session.start();
        self.collect();

        for _ in 0..steps {
            self.step();
        }

        self.finish(steps)
    }

    /// One round: settle plays, inject element and user input, advance time
    pub fn step(&mut self) {
        self.settle_plays();
        self.inject_media_event();
        self.inject_user_action();
        self.collect();

        self.advance_clock();
        self.collect();
    }

    fn finish(mut self, steps: usize) -> SimulationReport {
        self.report.steps = steps;
        self.report.elapsed_ms = u64::try_from(self.timers.now().as_millis()).unwrap_or(u64::MAX);
        self.report.final_state = Some(self.session.snapshot());

        info!(
            elapsed_ms = self.report.elapsed_ms,
            track_changes = self.report.track_changes,
            fallbacks = self.report.fallbacks,
            retries = self.report.retries,
            failovers = self.report.failovers,
            "Simulation finished"
        );

        self.report
    }

    fn settle_plays(&mut self) {
        for ticket in self.session.media_mut().take_pending() {
            if self.rng.gen_bool(self.fault_rate) {
                self.report.play_failures += 1;
                self.session.play_settled(
                    ticket,
                    Err(PlayError::Failed("simulated decode failure".to_string())),
                );
            } else {
                self.report.plays_confirmed += 1;
                self.session.media_mut().playing = true;
                self.session.play_settled(ticket, Ok(()));
                self.session
                    .handle_media_event(ticket.generation, MediaEvent::Playing);
            }
        }
    }

    fn inject_media_event(&mut self) {
        if !self.session.is_playing() {
            return;
        }

        let roll: f64 = self.rng.gen();
        let event = if roll < self.fault_rate / 2.0 {
            self.session.media_mut().starved = true;
            MediaEvent::Stalled
        } else if roll < self.fault_rate {
            MediaEvent::Error
        } else if roll < self.fault_rate + ENDED_RATE {
            MediaEvent::Ended
        } else {
            return;
        };

        if event != MediaEvent::Ended {
            self.report.injected_faults += 1;
        }

        let generation = self.session.media().loaded_generation();
        debug!(event = event.as_str(), %generation, "Injecting media event");
        self.session.handle_media_event(generation, event);
    }

    fn inject_user_action(&mut self) {
        let roll: f64 = self.rng.gen();
        if roll < self.user_action_rate / 2.0 {
            debug!("Simulated click: play/pause");
            self.session.toggle_play();
        } else if roll < self.user_action_rate {
            debug!("Simulated click: next");
            self.session.next_track();
        }
    }

    fn advance_clock(&mut self) {
        let dt = self
            .timers
            .next_due_in()
            .map_or(STEP, |due| due.min(STEP));

        for timer in self.timers.advance(dt) {
            self.session.fire_timer(timer);
        }
        self.session.media_mut().tick(dt);
    }

    /// Schedule requested timers and log queued events
    fn collect(&mut self) {
        self.timers.schedule_all(self.session.drain_timers());

        let at_ms = self.timers.now().as_millis();
        for event in self.session.drain_events() {
            match &event {
                SessionEvent::TrackChanged {
                    track_id, source, ..
                } => {
                    self.report.track_changes += 1;
                    info!(at_ms, track = %track_id, source = %source, "Track changed");
                }
                SessionEvent::FellBackToLocal { track_id, local_path } => {
                    self.report.fallbacks += 1;
                    warn!(at_ms, track = %track_id, local_path = %local_path, "Fell back to local copy");
                }
                SessionEvent::RetryScheduled {
                    track_id,
                    attempt,
                    max_retries,
                } => {
                    self.report.retries += 1;
                    warn!(at_ms, track = %track_id, attempt, max_retries, "Retrying track");
                }
                SessionEvent::FailedOver {
                    from_track_id,
                    to_track_id,
                } => {
                    self.report.failovers += 1;
                    warn!(at_ms, from = %from_track_id, to = %to_track_id, "Failed over");
                }
                other => debug!(at_ms, event = ?other, "Session event"),
            }
        }
    }
}
