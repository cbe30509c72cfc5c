//! Playback session - core orchestration
//!
//! Owns the current track, the single media element and every flag the
//! player UI renders. All mutation happens through `&mut self`: user
//! operations, element events, settled play requests and fired timers. Async
//! completions carry the [`Generation`] they were issued for and are dropped
//! once a newer source has been loaded.

use crate::{
    clock::{Timer, TimerRequest},
    error::{PlayError, PlaybackError, Result},
    events::SessionEvent,
    media::{MediaElement, MediaEvent},
    recovery::{Health, RecoveryAction, RecoveryPolicy},
    selection,
    types::{ConnectionStatus, Generation, PlayTicket, SessionConfig, SessionPhase},
    volume::Volume,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use vex_core::{Catalog, Mood, SourceResolver, Track, TrackSources};

/// What went wrong with the current source
#[derive(Debug, Clone, Copy)]
enum Fault {
    MediaError,
    Stall(MediaEvent),
    PlayRejected,
    Starved,
}

/// Serializable view of the session for UIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub current_index: usize,
    pub track_count: usize,
    pub track_id: String,
    pub title: String,
    pub mood: Option<Mood>,
    pub source: String,
    pub using_fallback: bool,
    pub is_playing: bool,
    pub is_loading: bool,
    pub autoplay_enabled: bool,
    pub has_user_interacted: bool,
    pub connection_status: ConnectionStatus,
    pub retry_count: u32,
    pub max_retries: u32,
    pub generation: Generation,
    pub picker_open: bool,
    pub visible: bool,
    pub volume: u8,
    pub muted: bool,
}

impl SessionSnapshot {
    /// Heading shown above the track title
    pub fn status_label(&self) -> &'static str {
        if self.is_playing {
            "NOW PLAYING"
        } else if !self.has_user_interacted {
            "CLICK ▶ TO START"
        } else {
            "PAUSED"
        }
    }

    /// e.g. `Track 3 of 44 • Random`
    pub fn position_label(&self) -> String {
        format!(
            "Track {} of {} • {}",
            self.current_index + 1,
            self.track_count,
            if self.autoplay_enabled {
                "Random"
            } else {
                "Sequential"
            }
        )
    }
}

/// The application's playback session
///
/// Construct one at startup, call [`start`](Self::start), and route element
/// events, play results and due timers back into it. After every call the
/// host drains [`drain_timers`](Self::drain_timers) and the UI drains
/// [`drain_events`](Self::drain_events).
pub struct PlaybackSession<M: MediaElement> {
    catalog: Catalog,
    resolver: Box<dyn SourceResolver>,
    media: M,
    config: SessionConfig,
    policy: RecoveryPolicy,
    rng: StdRng,
    volume: Volume,

    current_index: usize,
    sources: TrackSources,
    loaded_track_id: Option<String>,
    started: bool,
    is_playing: bool,
    is_loading: bool,
    autoplay_enabled: bool,
    has_user_interacted: bool,
    picker_open: bool,
    visible: bool,
    health: Health,
    using_fallback: bool,

    generation: Generation,
    pending_play: Option<PlayTicket>,
    resume_pending: bool,
    next_play_seq: u64,

    pending_events: Vec<SessionEvent>,
    pending_timers: Vec<TimerRequest>,
    last_state: Option<(SessionPhase, bool, bool)>,
    last_connection: ConnectionStatus,
}

impl<M: MediaElement> PlaybackSession<M> {
    /// Create a session with a random starting track
    ///
    /// Nothing is loaded until [`start`](Self::start).
    pub fn new(
        catalog: Catalog,
        resolver: impl SourceResolver + 'static,
        media: M,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::from_entropy();
        let current_index = rng.gen_range(0..catalog.len());
        let resolver: Box<dyn SourceResolver> = Box::new(resolver);
        let sources = catalog.tracks()[current_index].sources(resolver.as_ref());

        let mut session = Self {
            policy: RecoveryPolicy::new(config.max_retries),
            volume: Volume::new(config.volume),
            autoplay_enabled: config.autoplay_enabled,
            catalog,
            resolver,
            media,
            config,
            rng,
            current_index,
            sources,
            loaded_track_id: None,
            started: false,
            is_playing: false,
            is_loading: false,
            has_user_interacted: false,
            picker_open: false,
            visible: true,
            health: Health::Healthy,
            using_fallback: false,
            generation: Generation::INITIAL,
            pending_play: None,
            resume_pending: false,
            next_play_seq: 0,
            pending_events: Vec::new(),
            pending_timers: Vec::new(),
            last_state: None,
            last_connection: ConnectionStatus::Good,
        };

        let volume = session.volume.element_volume();
        session.media.set_volume(volume);
        Ok(session)
    }

    /// Reseed the random source and re-pick the starting track
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        let index = self.rng.gen_range(0..self.catalog.len());
        self.set_start_index(index);
        self
    }

    /// Start from a specific track instead of a random one
    pub fn with_start_index(mut self, index: usize) -> Result<Self> {
        self.check_index(index)?;
        self.set_start_index(index);
        Ok(self)
    }

    fn set_start_index(&mut self, index: usize) {
        self.current_index = index;
        self.sources = self.catalog.tracks()[index].sources(self.resolver.as_ref());
    }

    // ===== Lifecycle =====

    /// Load the current track, schedule the autoplay attempt and arm the
    /// health check
    pub fn start(&mut self) {
        if self.started {
            debug!("session already started");
            return;
        }
        self.started = true;

        if self.generation == Generation::INITIAL {
            self.load_current();
        }
        if self.config.autoplay_on_start {
            self.schedule(Timer::Autoplay, self.config.autoplay_delay());
        }
        self.schedule(Timer::HealthCheck, self.config.health_check_interval());

        info!(
            track_id = %self.current_track().id,
            tracks = self.catalog.len(),
            "playback session started"
        );
        self.sync_state();
    }

    // ===== Playback Control =====

    /// Play if paused, pause if playing (or about to play)
    ///
    /// Counts as the user gesture browsers require before unattended audio.
    pub fn toggle_play(&mut self) {
        self.has_user_interacted = true;
        if !self.started {
            self.start();
        }

        if self.wants_playback() {
            self.pending_play = None;
            self.resume_pending = false;
            self.media.pause();
            self.is_playing = false;
            self.is_loading = false;
            debug!("paused by user");
        } else {
            self.request_play();
        }

        self.sync_state();
    }

    /// Advance: random other track with autoplay on, next in order otherwise
    pub fn next_track(&mut self) {
        let len = self.catalog.len();
        let index = if self.autoplay_enabled {
            selection::random_other(&mut self.rng, len, self.current_index)
        } else {
            selection::following(len, self.current_index)
        };
        let resume = self.wants_playback();
        self.switch_to(index, resume);
        self.sync_state();
    }

    /// Go back: random other track with autoplay on, previous in order otherwise
    pub fn prev_track(&mut self) {
        let len = self.catalog.len();
        let index = if self.autoplay_enabled {
            selection::random_other(&mut self.rng, len, self.current_index)
        } else {
            selection::preceding(len, self.current_index)
        };
        let resume = self.wants_playback();
        self.switch_to(index, resume);
        self.sync_state();
    }

    /// Jump to a catalog index and close the track picker
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` is not a catalog index; the session is
    /// left untouched.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;

        self.update_picker(false);
        let resume = self.wants_playback();
        self.switch_to(index, resume);
        self.sync_state();
        Ok(())
    }

    // ===== Media Element Input =====

    /// Feed an element event tagged with the generation of its source
    pub fn handle_media_event(&mut self, generation: Generation, event: MediaEvent) {
        if generation != self.generation {
            debug!(
                event = event.as_str(),
                event_generation = %generation,
                current = %self.generation,
                "discarding stale media event"
            );
            return;
        }

        match event {
            MediaEvent::LoadedData | MediaEvent::CanPlay => {
                if self.pending_play.is_none() {
                    self.is_loading = false;
                }
            }
            MediaEvent::Playing => {
                self.is_playing = true;
                self.is_loading = false;
            }
            MediaEvent::Pause => {
                self.is_playing = false;
            }
            MediaEvent::Ended => self.on_track_end(),
            MediaEvent::Error => {
                let wanted = self.wants_playback();
                self.recover(Fault::MediaError, wanted);
            }
            MediaEvent::Waiting | MediaEvent::Stalled | MediaEvent::Suspend => {
                if !self.is_playing {
                    // Buffering ahead of a pending play is not a fault
                    debug!(
                        event = event.as_str(),
                        pending = self.wants_playback(),
                        "ignoring stall while not playing"
                    );
                } else if event == MediaEvent::Suspend && self.media.ready_state().is_sufficient() {
                    debug!("suspend with enough data buffered");
                } else {
                    self.recover(Fault::Stall(event), true);
                }
            }
        }

        self.sync_state();
    }

    /// Report how a `play()` request settled
    pub fn play_settled(&mut self, ticket: PlayTicket, result: std::result::Result<(), PlayError>) {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = %ticket.generation,
                current = %self.generation,
                "discarding stale play result"
            );
            return;
        }

        if self.pending_play != Some(ticket) {
            // Cancelled by a pause: the element must not keep playing
            if result.is_ok() && self.pending_play.is_none() && !self.resume_pending {
                debug!(seq = ticket.seq, "cancelled play resolved, pausing element");
                self.media.pause();
                self.is_playing = false;
                self.sync_state();
            }
            return;
        }
        self.pending_play = None;

        match result {
            Ok(()) => {
                self.is_loading = false;
                self.is_playing = true;
                self.health = self.policy.on_success(self.health);
            }
            Err(PlayError::NotAllowed) => {
                self.is_loading = false;
                self.is_playing = false;
                info!("autoplay blocked, waiting for user interaction");
                self.emit(SessionEvent::AutoplayBlocked);
            }
            Err(PlayError::Aborted) => {
                self.is_loading = false;
                debug!(seq = ticket.seq, "play request aborted");
            }
            Err(PlayError::Failed(reason)) => {
                warn!(%reason, "play request failed");
                self.recover(Fault::PlayRejected, true);
            }
        }

        self.sync_state();
    }

    /// Run a timer the host scheduled from [`drain_timers`](Self::drain_timers)
    pub fn fire_timer(&mut self, timer: Timer) {
        if let Some(generation) = timer.generation() {
            if generation != self.generation {
                debug!(?timer, current = %self.generation, "discarding stale timer");
                return;
            }
        }

        match timer {
            Timer::Autoplay => {
                if self.has_user_interacted || self.wants_playback() {
                    debug!("autoplay attempt skipped");
                } else {
                    info!(track_id = %self.current_track().id, "attempting autoplay");
                    self.request_play();
                }
            }
            Timer::ResumeAfterSwitch(_) | Timer::RetryResume(_) => {
                if self.resume_pending {
                    self.resume_pending = false;
                    self.request_play();
                } else {
                    debug!(?timer, "resume no longer wanted");
                }
            }
            Timer::MarkRecovered(_) => {
                self.health = self.policy.on_recovered(self.health);
            }
            Timer::HealthCheck => {
                let ready = self.media.ready_state();
                if self.is_playing && !ready.is_sufficient() {
                    warn!(?ready, "health check found insufficient buffer");
                    self.recover(Fault::Starved, true);
                }
                self.schedule(Timer::HealthCheck, self.config.health_check_interval());
            }
        }

        self.sync_state();
    }

    // ===== Settings & UI =====

    pub fn set_autoplay(&mut self, enabled: bool) {
        if self.autoplay_enabled != enabled {
            self.autoplay_enabled = enabled;
            self.emit(SessionEvent::AutoplayChanged { enabled });
        }
    }

    pub fn toggle_autoplay(&mut self) {
        self.set_autoplay(!self.autoplay_enabled);
    }

    pub fn toggle_picker(&mut self) {
        self.update_picker(!self.picker_open);
    }

    pub fn set_picker_open(&mut self, open: bool) {
        self.update_picker(open);
    }

    /// Show the global player (visibility only; playback is unaffected)
    pub fn show(&mut self) {
        self.update_visibility(true);
    }

    /// Hide the global player, e.g. on pages with their own audio
    pub fn hide(&mut self) {
        self.update_visibility(false);
    }

    // ===== Volume =====

    /// Set volume level (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_volume();
    }

    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    // ===== State Queries =====

    pub fn phase(&self) -> SessionPhase {
        if !self.started {
            return SessionPhase::Idle;
        }
        if self.health == Health::Failed {
            return SessionPhase::FailedOver;
        }

        let degraded = matches!(self.health, Health::Degraded(_));
        let in_flight = self.is_loading || self.resume_pending || self.pending_play.is_some();

        if degraded && in_flight {
            SessionPhase::Recovering
        } else if self.is_playing {
            SessionPhase::Playing
        } else if in_flight {
            SessionPhase::Buffering
        } else if degraded {
            SessionPhase::Stalled
        } else {
            SessionPhase::Paused
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> &Track {
        &self.catalog.tracks()[self.current_index]
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sources resolved for the current track
    pub fn sources(&self) -> &TrackSources {
        &self.sources
    }

    /// URL the element is (or will be) playing
    pub fn active_source(&self) -> &str {
        if self.using_fallback {
            &self.sources.local
        } else {
            self.sources.preferred()
        }
    }

    pub fn is_using_fallback(&self) -> bool {
        self.using_fallback
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.autoplay_enabled
    }

    pub fn has_user_interacted(&self) -> bool {
        self.has_user_interacted
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.health.connection_status()
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn retry_count(&self) -> u32 {
        self.health.retry_count()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Outstanding play request, if any
    pub fn pending_play(&self) -> Option<PlayTicket> {
        self.pending_play
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let track = self.current_track();
        SessionSnapshot {
            phase: self.phase(),
            current_index: self.current_index,
            track_count: self.catalog.len(),
            track_id: track.id.clone(),
            title: track.title.clone(),
            mood: track.mood,
            source: self.active_source().to_string(),
            using_fallback: self.using_fallback,
            is_playing: self.is_playing,
            is_loading: self.is_loading,
            autoplay_enabled: self.autoplay_enabled,
            has_user_interacted: self.has_user_interacted,
            connection_status: self.connection_status(),
            retry_count: self.retry_count(),
            max_retries: self.policy.max_retries(),
            generation: self.generation,
            picker_open: self.picker_open,
            visible: self.visible,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        }
    }

    // ===== Outbox =====

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Take all timer requests issued since the last drain
    pub fn drain_timers(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.pending_timers)
    }

    // ===== Internal =====

    /// Playing, about to play, or waiting to resume
    fn wants_playback(&self) -> bool {
        self.is_playing || self.resume_pending || self.pending_play.is_some()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.catalog.len();
        if index >= len {
            return Err(PlaybackError::IndexOutOfBounds { index, len });
        }
        Ok(())
    }

    /// Make `index` current, load it, and resume after the switch delay
    fn switch_to(&mut self, index: usize, resume: bool) {
        self.current_index = index;
        self.health = Health::Healthy;
        self.using_fallback = false;
        self.resume_pending = false;
        self.load_current();

        if resume {
            self.schedule_resume(
                Timer::ResumeAfterSwitch(self.generation),
                self.config.switch_resume_delay(),
            );
        }
    }

    fn load_current(&mut self) {
        let (track_id, sources) = {
            let track = self.current_track();
            (track.id.clone(), track.sources(self.resolver.as_ref()))
        };
        let url = sources.preferred().to_string();
        self.sources = sources;

        let previous_track_id = self.loaded_track_id.replace(track_id.clone());
        self.load_url(&url);

        info!(
            track_id = %track_id,
            index = self.current_index,
            source = %url,
            generation = %self.generation,
            "track changed"
        );
        self.emit(SessionEvent::TrackChanged {
            index: self.current_index,
            track_id,
            previous_track_id,
            source: url,
        });
    }

    /// Assign a new source; everything issued for the old one becomes stale
    fn load_url(&mut self, url: &str) {
        self.generation = self.generation.next();
        self.pending_play = None;
        self.is_playing = false;
        self.is_loading = true;
        self.media.load_source(url, self.generation);
    }

    fn request_play(&mut self) {
        self.next_play_seq += 1;
        let ticket = PlayTicket {
            generation: self.generation,
            seq: self.next_play_seq,
        };
        self.pending_play = Some(ticket);
        self.is_loading = true;

        debug!(generation = %ticket.generation, seq = ticket.seq, "requesting play");
        self.media.play(ticket);
    }

    fn on_track_end(&mut self) {
        self.is_playing = false;
        let finished = self.current_track().id.clone();

        if self.autoplay_enabled {
            let index =
                selection::random_other(&mut self.rng, self.catalog.len(), self.current_index);
            info!(track_id = %finished, "track ended, advancing");
            self.switch_to(index, true);
        } else {
            self.pending_play = None;
            self.resume_pending = false;
            self.is_loading = false;
            info!(track_id = %finished, "track ended");
        }
    }

    /// Carry out the recovery policy for a fault on the current source
    fn recover(&mut self, fault: Fault, wanted: bool) {
        let fallback_available = !self.using_fallback && self.sources.has_distinct_fallback();
        let (health, action) = self.policy.on_fault(self.health, fallback_available);
        self.health = health;
        self.resume_pending = false;

        let track_id = self.current_track().id.clone();
        warn!(track_id = %track_id, ?fault, ?action, "playback fault");

        match action {
            RecoveryAction::FallbackToLocal => {
                self.using_fallback = true;
                let local_path = self.sources.local.clone();
                self.load_url(&local_path);
                self.emit(SessionEvent::FellBackToLocal {
                    track_id,
                    local_path,
                });
                if wanted {
                    self.schedule_resume(
                        Timer::RetryResume(self.generation),
                        self.config.switch_resume_delay(),
                    );
                }
            }
            RecoveryAction::Reload { attempt } => {
                let position = self.media.current_time();
                let url = self.active_source().to_string();
                self.load_url(&url);
                self.media.set_current_time(position);
                self.emit(SessionEvent::RetryScheduled {
                    track_id,
                    attempt,
                    max_retries: self.policy.max_retries(),
                });
                if wanted {
                    self.schedule_resume(
                        Timer::RetryResume(self.generation),
                        self.config.retry_resume_delay(),
                    );
                }
            }
            RecoveryAction::FailOver => {
                let index =
                    selection::random_other(&mut self.rng, self.catalog.len(), self.current_index);
                self.switch_to(index, wanted);
                self.health = Health::Failed;

                let to_track_id = self.current_track().id.clone();
                warn!(from = %track_id, to = %to_track_id, "retries exhausted, failing over");
                self.emit(SessionEvent::FailedOver {
                    from_track_id: track_id,
                    to_track_id,
                });
                self.schedule(
                    Timer::MarkRecovered(self.generation),
                    self.config.recovered_delay(),
                );
            }
        }
    }

    fn schedule_resume(&mut self, timer: Timer, delay: Duration) {
        self.resume_pending = true;
        self.schedule(timer, delay);
    }

    fn schedule(&mut self, timer: Timer, delay: Duration) {
        self.pending_timers.push(TimerRequest::new(timer, delay));
    }

    fn update_picker(&mut self, open: bool) {
        if self.picker_open != open {
            self.picker_open = open;
            self.emit(SessionEvent::PickerToggled { open });
        }
    }

    fn update_visibility(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.emit(SessionEvent::VisibilityChanged { visible });
        }
    }

    fn apply_volume(&mut self) {
        self.media.set_volume(self.volume.element_volume());
        self.emit(SessionEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    /// Emit state and connection changes accumulated by the last operation
    fn sync_state(&mut self) {
        let state = (self.phase(), self.is_playing, self.is_loading);
        if self.last_state != Some(state) {
            self.last_state = Some(state);
            self.emit(SessionEvent::StateChanged {
                phase: state.0,
                is_playing: state.1,
                is_loading: state.2,
            });
        }

        let status = self.health.connection_status();
        if status != self.last_connection {
            self.last_connection = status;
            self.emit(SessionEvent::ConnectionChanged { status });
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }
}

impl<M: MediaElement> std::fmt::Debug for PlaybackSession<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("phase", &self.phase())
            .field("current_index", &self.current_index)
            .field("generation", &self.generation)
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}
