//! Relay policy tests: which child signals reach aggregate listeners.

mod common;

use bridge_traits::{EventClass, MediaEventKind};
use common::{drain, drain_kinds, SimulatedMedia};
use core_runtime::events::{EventBus, EventStream};
use core_sequencer::{MediaSequencer, Propagation, RelayMode};

fn two_clips() -> (MediaSequencer, EventBus) {
    let bus = EventBus::new(128);
    let sequencer = MediaSequencer::builder()
        .event_bus(bus.clone())
        .id("pair")
        .child(SimulatedMedia::audio("first").loaded(20.0))
        .child(SimulatedMedia::audio("second").loaded(20.0))
        .build()
        .unwrap();
    (sequencer, bus)
}

#[test]
fn test_inactive_child_signals_never_reach_listeners() {
    let (mut sequencer, bus) = two_clips();
    let mut listener = bus.subscribe();

    for kind in MediaEventKind::ALL {
        if kind == MediaEventKind::Error {
            continue;
        }
        assert_eq!(
            sequencer.handle_child_event(1, kind).unwrap(),
            Propagation::Stopped,
            "{kind} should be intercepted"
        );
    }

    assert!(drain_kinds(&mut listener).is_empty());
    assert_eq!(sequencer.current_time(), 0.0);
    assert_eq!(sequencer.active_child(), Some(0));
}

#[test]
fn test_active_child_playback_signals_are_forwarded() {
    let (mut sequencer, bus) = two_clips();
    let mut listener = bus.subscribe();

    let playback: Vec<MediaEventKind> = MediaEventKind::ALL
        .into_iter()
        .filter(|kind| kind.class() == EventClass::Playback)
        .collect();
    for kind in &playback {
        sequencer.handle_child_event(0, *kind).unwrap();
    }

    let signals = drain(&mut listener);
    assert_eq!(
        signals.iter().map(|signal| signal.kind).collect::<Vec<_>>(),
        playback
    );
    assert!(signals.iter().all(|signal| signal.origin == "pair"));
}

#[test]
fn test_transport_signals_are_never_forwarded() {
    let (mut sequencer, bus) = two_clips();
    let mut listener = bus.subscribe();

    for kind in [
        MediaEventKind::DurationKnown,
        MediaEventKind::DataLoaded,
        MediaEventKind::VolumeChanged,
    ] {
        sequencer.handle_child_event(0, kind).unwrap();
    }
    assert!(drain_kinds(&mut listener).is_empty());
}

#[test]
fn test_previous_owner_is_silenced_after_swap() {
    let (mut sequencer, bus) = two_clips();
    let mut listener = bus.subscribe();

    sequencer.set_current_time(25.0).unwrap();
    assert_eq!(sequencer.relay_mode(0), RelayMode::Suppress);
    drain_kinds(&mut listener);

    for kind in [
        MediaEventKind::Pause,
        MediaEventKind::Progress,
        MediaEventKind::Ended,
        MediaEventKind::Playing,
    ] {
        sequencer.handle_child_event(0, kind).unwrap();
    }
    assert!(drain_kinds(&mut listener).is_empty());
}

#[test]
fn test_child_error_is_relayed_under_aggregate_identity() {
    let (mut sequencer, bus) = two_clips();
    let mut errors = EventStream::new(bus.subscribe())
        .filter(|signal| signal.kind == MediaEventKind::Error);

    sequencer
        .handle_child_event(1, MediaEventKind::Error)
        .unwrap();

    let signal = errors.try_recv().unwrap().unwrap();
    assert_eq!(signal.origin, "pair");
    assert!(errors.try_recv().is_none());
}

#[tokio::test]
async fn test_listener_on_another_task_receives_progress() {
    let (mut sequencer, bus) = two_clips();
    let mut progress = EventStream::new(bus.subscribe())
        .filter(|signal| signal.kind == MediaEventKind::Progress);

    sequencer
        .handle_child_event(0, MediaEventKind::Progress)
        .unwrap();

    let signal = progress.recv().await.unwrap();
    assert_eq!(signal.kind, MediaEventKind::Progress);
}
