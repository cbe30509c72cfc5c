/// Common test utilities: a recording media element and timer helpers
use std::time::Duration;
use vex_core::{Catalog, SourceResolver, Track};
use vex_playback::{
    Generation, MediaElement, MediaEvent, PlayError, PlayTicket, PlaybackSession, ReadyState,
    SessionConfig, TimerQueue,
};

/// Media element that records every call
#[derive(Debug)]
pub struct MockMedia {
    pub loads: Vec<(String, Generation)>,
    pub plays: Vec<PlayTicket>,
    pub pauses: usize,
    pub seeks: Vec<Duration>,
    pub position: Duration,
    pub volume: f32,
    pub ready: ReadyState,
}

impl Default for MockMedia {
    fn default() -> Self {
        Self {
            loads: Vec::new(),
            plays: Vec::new(),
            pauses: 0,
            seeks: Vec::new(),
            position: Duration::ZERO,
            volume: 1.0,
            ready: ReadyState::HaveEnoughData,
        }
    }
}

impl MockMedia {
    pub fn last_load(&self) -> &str {
        self.loads.last().map(|(url, _)| url.as_str()).unwrap_or("")
    }
}

impl MediaElement for MockMedia {
    fn load_source(&mut self, url: &str, generation: Generation) {
        self.loads.push((url.to_string(), generation));
        self.position = Duration::ZERO;
    }

    fn play(&mut self, ticket: PlayTicket) {
        self.plays.push(ticket);
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn current_time(&self) -> Duration {
        self.position
    }

    fn set_current_time(&mut self, position: Duration) {
        self.seeks.push(position);
        self.position = position;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn ready_state(&self) -> ReadyState {
        self.ready
    }

    fn current_source(&self) -> Option<String> {
        self.loads.last().map(|(url, _)| url.clone())
    }
}

pub type Session = PlaybackSession<MockMedia>;

/// Catalog of `n` tracks with ids `t0..tn`
pub fn catalog(n: usize) -> Catalog {
    let tracks = (0..n)
        .map(|i| Track::new(format!("t{i}"), format!("Track {i}"), format!("t{i}.mp3")))
        .collect();
    Catalog::from_tracks(tracks).unwrap()
}

pub fn session_with(
    n: usize,
    resolver: impl SourceResolver + 'static,
    config: SessionConfig,
    start: usize,
) -> Session {
    PlaybackSession::new(catalog(n), resolver, MockMedia::default(), config)
        .unwrap()
        .with_seed(42)
        .with_start_index(start)
        .unwrap()
}

/// Settle every outstanding play request with `result`
pub fn settle_all(session: &mut Session, result: Result<(), PlayError>) {
    let plays: Vec<_> = session.media_mut().plays.drain(..).collect();
    for ticket in plays {
        session.play_settled(ticket, result.clone());
    }
}

/// Run timers due within `window`, scheduling new requests as they appear
pub fn run_for(session: &mut Session, queue: &mut TimerQueue, window: Duration) {
    queue.schedule_all(session.drain_timers());
    let deadline = queue.now() + window;

    while let Some(wait) = queue.next_due_in() {
        if queue.now() + wait > deadline {
            break;
        }
        if let Some(timer) = queue.pop_next() {
            session.fire_timer(timer);
            queue.schedule_all(session.drain_timers());
        }
    }

    let remaining = deadline.saturating_sub(queue.now());
    assert!(queue.advance(remaining).is_empty());
}

/// Start the session and let autoplay succeed
pub fn start_playing(session: &mut Session, queue: &mut TimerQueue) {
    session.start();
    run_for(session, queue, Duration::from_millis(1000));
    settle_all(session, Ok(()));
    assert!(session.is_playing());
}

/// Send an element event for the current source
pub fn media_event(session: &mut Session, event: MediaEvent) {
    let generation = session.generation();
    session.handle_media_event(generation, event);
}
