//! Timer requests and a virtual clock
//!
//! The session never sleeps. Every delay becomes a [`TimerRequest`] that the
//! host drains and schedules (`setTimeout` in the browser, a [`TimerQueue`]
//! in tests and the simulator). When a timer is due the host hands it back
//! through `PlaybackSession::fire_timer`.

use crate::types::Generation;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delayed work the session asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timer {
    /// Unattended playback attempt after start
    Autoplay,

    /// Resume after a track switch settled
    ResumeAfterSwitch(Generation),

    /// Resume after a reload or a local fallback
    RetryResume(Generation),

    /// Show a failed-over connection as good again
    MarkRecovered(Generation),

    /// Passive readiness check; re-armed every time it fires
    HealthCheck,
}

impl Timer {
    /// Generation the timer is bound to, if any
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Self::ResumeAfterSwitch(g) | Self::RetryResume(g) | Self::MarkRecovered(g) => Some(*g),
            Self::Autoplay | Self::HealthCheck => None,
        }
    }
}

/// A timer and how long to wait before firing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRequest {
    pub timer: Timer,
    #[serde(rename = "delayMs", with = "millis")]
    pub delay: Duration,
}

impl TimerRequest {
    pub fn new(timer: Timer, delay: Duration) -> Self {
        Self { timer, delay }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    seq: u64,
    timer: Timer,
}

/// Deterministic virtual clock
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: Vec<Scheduled>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the queue was created
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule a request relative to the current time
    pub fn schedule(&mut self, request: TimerRequest) {
        self.pending.push(Scheduled {
            due: self.now + request.delay,
            seq: self.next_seq,
            timer: request.timer,
        });
        self.next_seq += 1;
    }

    /// Schedule every request in order
    pub fn schedule_all(&mut self, requests: impl IntoIterator<Item = TimerRequest>) {
        for request in requests {
            self.schedule(request);
        }
    }

    /// Time until the earliest pending timer
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|s| s.due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return every timer that came due, in order
    pub fn advance(&mut self, by: Duration) -> Vec<Timer> {
        self.now += by;
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = rest;

        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.timer).collect()
    }

    /// Jump to the earliest pending timer and pop it
    pub fn pop_next(&mut self) -> Option<Timer> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i)?;

        let scheduled = self.pending.swap_remove(position);
        self.now = self.now.max(scheduled.due);
        Some(scheduled.timer)
    }

    /// Drop every pending timer matching `predicate`
    pub fn cancel_where(&mut self, predicate: impl Fn(&Timer) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| !predicate(&s.timer));
        before - self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn advance_returns_due_timers_in_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerRequest::new(Timer::HealthCheck, ms(300)));
        queue.schedule(TimerRequest::new(Timer::Autoplay, ms(100)));
        queue.schedule(TimerRequest::new(
            Timer::RetryResume(Generation::new(1)),
            ms(100),
        ));

        assert!(queue.advance(ms(50)).is_empty());
        assert_eq!(
            queue.advance(ms(50)),
            vec![Timer::Autoplay, Timer::RetryResume(Generation::new(1))]
        );
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.now(), ms(100));
        assert_eq!(queue.next_due_in(), Some(ms(200)));
    }

    #[test]
    fn schedule_is_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance(ms(1000));
        queue.schedule(TimerRequest::new(Timer::Autoplay, ms(10)));

        assert!(queue.advance(ms(9)).is_empty());
        assert_eq!(queue.advance(ms(1)), vec![Timer::Autoplay]);
    }

    #[test]
    fn pop_next_jumps_clock() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerRequest::new(Timer::HealthCheck, ms(30_000)));
        queue.schedule(TimerRequest::new(Timer::Autoplay, ms(1000)));

        assert_eq!(queue.pop_next(), Some(Timer::Autoplay));
        assert_eq!(queue.now(), ms(1000));
        assert_eq!(queue.pop_next(), Some(Timer::HealthCheck));
        assert_eq!(queue.now(), ms(30_000));
        assert_eq!(queue.pop_next(), None);
    }

    #[test]
    fn cancel_where_drops_matching() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerRequest::new(Timer::HealthCheck, ms(1)));
        queue.schedule(TimerRequest::new(Timer::Autoplay, ms(1)));

        assert_eq!(queue.cancel_where(|t| *t == Timer::Autoplay), 1);
        assert_eq!(queue.advance(ms(1)), vec![Timer::HealthCheck]);
    }

    #[test]
    fn timer_generation() {
        let g = Generation::new(7);
        assert_eq!(Timer::MarkRecovered(g).generation(), Some(g));
        assert_eq!(Timer::HealthCheck.generation(), None);
    }

    #[test]
    fn request_serializes_delay_in_millis() {
        let request = TimerRequest::new(Timer::ResumeAfterSwitch(Generation::new(2)), ms(100));
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["delayMs"], 100);
        assert_eq!(json["timer"]["ResumeAfterSwitch"], 2);
    }
}
