//! Tests for MediaWrapper delegation and its behaviour inside a sequencer.

mod common;

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::{MediaElement, MediaEventKind, MediaKind, ReadyState};
use common::SimulatedMedia;
use core_sequencer::{ClipWindow, IdGenerator, MediaSequencer, MediaWrapper};
use mockall::mock;
use mockall::predicate::eq;

mock! {
    Backend {}

    impl MediaElement for Backend {
        fn id(&self) -> &str;
        fn kind(&self) -> MediaKind;
        fn set_active(&mut self, active: bool);
        fn current_time(&self) -> f64;
        fn set_current_time(&mut self, time: f64) -> Result<()>;
        fn duration(&self) -> f64;
        fn paused(&self) -> bool;
        fn seeking(&self) -> bool;
        fn ended(&self) -> bool;
        fn ready_state(&self) -> ReadyState;
        fn volume(&self) -> f64;
        fn set_volume(&mut self, volume: f64) -> Result<()>;
        fn muted(&self) -> bool;
        fn set_muted(&mut self, muted: bool) -> Result<()>;
        fn play(&mut self) -> Result<()>;
        fn pause(&mut self) -> Result<()>;
    }
}

#[test]
fn test_wrapper_delegates_commands() {
    let mut backend = MockBackend::new();
    backend.expect_play().times(1).returning(|| Ok(()));
    backend.expect_pause().times(1).returning(|| Ok(()));
    backend
        .expect_set_current_time()
        .with(eq(12.0))
        .times(1)
        .returning(|_| Ok(()));
    backend
        .expect_set_volume()
        .with(eq(0.25))
        .times(1)
        .returning(|_| Ok(()));
    backend
        .expect_set_muted()
        .with(eq(true))
        .times(1)
        .returning(|_| Ok(()));
    backend
        .expect_set_active()
        .with(eq(true))
        .times(1)
        .return_const(());

    let mut ids = IdGenerator::new("wrapper");
    let mut wrapper = MediaWrapper::new(Box::new(backend), "widget", &mut ids);

    wrapper.play().unwrap();
    wrapper.pause().unwrap();
    wrapper.set_current_time(12.0).unwrap();
    wrapper.set_volume(0.25).unwrap();
    wrapper.set_muted(true).unwrap();
    wrapper.set_active(true);
}

#[test]
fn test_wrapper_delegates_properties() {
    let mut backend = MockBackend::new();
    backend.expect_kind().return_const(MediaKind::Video);
    backend.expect_current_time().return_const(3.5);
    backend.expect_duration().return_const(60.0);
    backend.expect_paused().return_const(false);
    backend.expect_seeking().return_const(true);
    backend.expect_ended().return_const(false);
    backend
        .expect_ready_state()
        .return_const(ReadyState::HaveFutureData);
    backend.expect_volume().return_const(0.8);
    backend.expect_muted().return_const(true);

    let mut ids = IdGenerator::default();
    let wrapper = MediaWrapper::new(Box::new(backend), "", &mut ids);

    assert_eq!(wrapper.id(), "id");
    assert_eq!(wrapper.kind(), MediaKind::Video);
    assert_eq!(wrapper.current_time(), 3.5);
    assert_eq!(wrapper.duration(), 60.0);
    assert!(!wrapper.paused());
    assert!(wrapper.seeking());
    assert!(!wrapper.ended());
    assert_eq!(wrapper.ready_state(), ReadyState::HaveFutureData);
    assert_eq!(wrapper.volume(), 0.8);
    assert!(wrapper.muted());
    assert!(!wrapper.positions_on_setup());
}

#[test]
fn test_wrapper_propagates_backend_failure() {
    let mut backend = MockBackend::new();
    backend
        .expect_play()
        .returning(|| Err(BridgeError::NotAvailable("plugin blocked".into())));

    let mut ids = IdGenerator::default();
    let mut wrapper = MediaWrapper::new(Box::new(backend), "flash", &mut ids);

    assert!(matches!(wrapper.play(), Err(BridgeError::NotAvailable(_))));
}

#[test]
fn test_wrapper_relabels_signals() {
    let mut ids = IdGenerator::new("youtubeMedia");
    ids.reserve("youtubeMedia");
    let wrapper = MediaWrapper::new(Box::new(MockBackend::new()), "", &mut ids);

    let signal = wrapper.relay(MediaEventKind::Playing);
    assert_eq!(signal.origin, "youtubeMedia1");
    assert_eq!(signal.kind, MediaEventKind::Playing);
}

#[test]
fn test_wrapper_clip_window() {
    let mut ids = IdGenerator::default();
    let base = SimulatedMedia::audio("base").clip(Some(4.0), Some(9.0));
    let wrapper = MediaWrapper::new(Box::new(base), "w", &mut ids);
    assert_eq!(wrapper.clip_begin(), Some(4.0));
    assert_eq!(wrapper.clip_end(), Some(9.0));

    let wrapper = wrapper.with_clip_window(ClipWindow::new(Some(1.0), None));
    assert_eq!(wrapper.clip_begin(), Some(1.0));
    assert_eq!(wrapper.clip_end(), None);
}

#[test]
fn test_wrapped_child_is_not_positioned_during_layout() {
    let mut ids = IdGenerator::new("media");
    let direct = SimulatedMedia::audio("direct").loaded(10.0);
    let wrapped_base = SimulatedMedia::video("widget").loaded(30.0);
    let wrapped_handle = wrapped_base.handle();
    let wrapped = MediaWrapper::new(Box::new(wrapped_base), "", &mut ids)
        .with_clip_window(ClipWindow::new(Some(5.0), None));

    let mut sequencer = MediaSequencer::builder()
        .id_from(&mut ids)
        .child(direct)
        .child(wrapped)
        .build()
        .unwrap();

    assert_eq!(sequencer.id(), "media1");
    assert_eq!(sequencer.duration(), 35.0);
    assert!(wrapped_handle.seeks().is_empty());

    // Activation seeks the wrapped backend on demand instead
    sequencer.set_current_time(12.0).unwrap();
    assert_eq!(wrapped_handle.seeks(), vec![7.0]);
    assert!(wrapped_handle.active());

    wrapped_handle.finish_seek();
    sequencer
        .handle_child_event(1, MediaEventKind::Seeked)
        .unwrap();
    assert_eq!(sequencer.current_time(), 12.0);
}
