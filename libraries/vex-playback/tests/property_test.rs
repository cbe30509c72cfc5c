//! Property-based tests for the playback session
//!
//! Random sequences of user operations, element events, play results and
//! timer ticks must never break the session invariants.

mod common;

use common::*;
use proptest::prelude::*;
use std::time::Duration;
use vex_core::{LocalOnlyResolver, PublicUrlResolver};
use vex_playback::{
    following, preceding, MediaEvent, PlayError, SessionConfig, TimerQueue,
};

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Toggle,
    Next,
    Prev,
    Select(usize),
    Event(MediaEvent),
    SettleOk,
    SettleErr,
    Tick(u64),
    SetAutoplay(bool),
}

fn arbitrary_event() -> impl Strategy<Value = MediaEvent> {
    prop_oneof![
        Just(MediaEvent::LoadedData),
        Just(MediaEvent::CanPlay),
        Just(MediaEvent::Playing),
        Just(MediaEvent::Pause),
        Just(MediaEvent::Ended),
        Just(MediaEvent::Error),
        Just(MediaEvent::Waiting),
        Just(MediaEvent::Stalled),
        Just(MediaEvent::Suspend),
    ]
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Toggle),
        Just(Op::Next),
        Just(Op::Prev),
        (0usize..12).prop_map(Op::Select),
        arbitrary_event().prop_map(Op::Event),
        Just(Op::SettleOk),
        Just(Op::SettleErr),
        (0u64..3000).prop_map(Op::Tick),
        any::<bool>().prop_map(Op::SetAutoplay),
    ]
}

fn apply(session: &mut Session, queue: &mut TimerQueue, op: &Op) {
    match op {
        Op::Toggle => session.toggle_play(),
        Op::Next => session.next_track(),
        Op::Prev => session.prev_track(),
        Op::Select(index) => {
            let _ = session.select_track(*index);
        }
        Op::Event(event) => media_event(session, *event),
        Op::SettleOk => settle_all(session, Ok(())),
        Op::SettleErr => settle_all(session, Err(PlayError::Failed("flaky".to_string()))),
        Op::Tick(ms) => run_for(session, queue, Duration::from_millis(*ms)),
        Op::SetAutoplay(enabled) => session.set_autoplay(*enabled),
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: the current index always refers to a catalog entry
    #[test]
    fn current_index_always_valid(
        len in 1usize..8,
        start in 0usize..8,
        ops in prop::collection::vec(arbitrary_op(), 0..80),
    ) {
        let start = start % len;
        let mut session = session_with(len, PublicUrlResolver::new("https://cdn.test", "m"), SessionConfig::default(), start);
        let mut queue = TimerQueue::new();
        session.start();

        for op in &ops {
            apply(&mut session, &mut queue, op);
            prop_assert!(session.current_index() < len);
            prop_assert_eq!(&session.current_track().id, &format!("t{}", session.current_index()));
        }
    }

    /// Property: retry count never exceeds the limit
    #[test]
    fn retry_count_bounded(
        max_retries in 1u32..5,
        ops in prop::collection::vec(arbitrary_op(), 0..80),
    ) {
        let config = SessionConfig { max_retries, ..Default::default() };
        let mut session = session_with(4, LocalOnlyResolver, config, 0);
        let mut queue = TimerQueue::new();
        session.start();

        for op in &ops {
            apply(&mut session, &mut queue, op);
            prop_assert!(session.retry_count() < max_retries);
        }
    }

    /// Property: stalls during playback fail over after exactly `max_retries`
    #[test]
    fn consecutive_stalls_fail_over_at_limit(max_retries in 1u32..6, len in 2usize..6) {
        let config = SessionConfig { max_retries, ..Default::default() };
        let mut session = session_with(len, LocalOnlyResolver, config, 0);
        let mut queue = TimerQueue::new();
        start_playing(&mut session, &mut queue);

        for expected in 1..max_retries {
            media_event(&mut session, MediaEvent::Stalled);
            prop_assert_eq!(session.retry_count(), expected);
            prop_assert_eq!(session.current_index(), 0);

            // Not counted until the reloaded source is playing again
            media_event(&mut session, MediaEvent::Stalled);
            prop_assert_eq!(session.retry_count(), expected);
            media_event(&mut session, MediaEvent::Playing);
        }

        media_event(&mut session, MediaEvent::Stalled);
        prop_assert_eq!(session.retry_count(), 0);
        prop_assert_ne!(session.current_index(), 0);
    }

    /// Property: buffering before the first confirmed play never triggers recovery
    #[test]
    fn stalls_before_play_confirms_are_ignored(
        events in prop::collection::vec(
            prop_oneof![
                Just(MediaEvent::Waiting),
                Just(MediaEvent::Stalled),
                Just(MediaEvent::Suspend),
            ],
            1..20,
        ),
    ) {
        let mut session = session_with(3, PublicUrlResolver::new("https://cdn.test", "m"), SessionConfig::default(), 0);
        session.start();
        session.toggle_play();

        for event in events {
            media_event(&mut session, event);
            prop_assert_eq!(session.retry_count(), 0);
            prop_assert!(!session.is_using_fallback());
        }
        prop_assert_eq!(session.media().loads.len(), 1);
    }

    /// Property: shuffle never selects the current track
    #[test]
    fn shuffle_never_repeats(len in 2usize..10, seed in any::<u64>(), steps in 1usize..50) {
        let mut session = vex_playback::PlaybackSession::new(
            catalog(len),
            LocalOnlyResolver,
            MockMedia::default(),
            SessionConfig::default(),
        )
        .unwrap()
        .with_seed(seed);
        session.start();

        for i in 0..steps {
            let before = session.current_index();
            if i % 2 == 0 {
                session.next_track();
            } else {
                session.prev_track();
            }
            prop_assert_ne!(session.current_index(), before);
        }
    }

    /// Property: without shuffle, next/prev step by one with wraparound
    #[test]
    fn sequential_steps_wrap(len in 1usize..10, start in 0usize..10, forward in any::<bool>()) {
        let start = start % len;
        let config = SessionConfig { autoplay_enabled: false, ..Default::default() };
        let mut session = session_with(len, LocalOnlyResolver, config, start);

        if forward {
            session.next_track();
            prop_assert_eq!(session.current_index(), following(len, start));
        } else {
            session.prev_track();
            prop_assert_eq!(session.current_index(), preceding(len, start));
        }
    }

    /// Property: two toggles in a row restore is_playing once plays settle
    #[test]
    fn double_toggle_is_idempotent(playing in any::<bool>()) {
        let mut session = session_with(3, LocalOnlyResolver, SessionConfig::default(), 0);
        let mut queue = TimerQueue::new();
        if playing {
            start_playing(&mut session, &mut queue);
        } else {
            session.start();
        }
        let before = session.is_playing();

        session.toggle_play();
        session.toggle_play();
        settle_all(&mut session, Ok(()));

        prop_assert_eq!(session.is_playing(), before);
    }
}
