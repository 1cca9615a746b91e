//! Sequencer demonstration
//!
//! Builds a three-clip session from in-memory clips and walks it through
//! loading, seeks across clips and the end of the timeline,
//! printing every aggregate signal. A wrapped widget then shows how a host
//! republishes a backend's signals under the wrapper's identity.
//!
//! Run with:
//! ```bash
//! cargo run --example sequencer_demo
//! ```

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{MediaElement, MediaEventKind, MediaKind, MediaSignal, ReadyState};
use core_runtime::config::SequencerConfig;
use core_runtime::events::{EventBus, Receiver};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_sequencer::{IdGenerator, MediaSequencer, MediaWrapper, Result};

/// In-memory clip that applies commands immediately.
struct Clip {
    id: &'static str,
    kind: MediaKind,
    clip: (Option<f64>, Option<f64>),
    duration: f64,
    time: f64,
    paused: bool,
    volume: f64,
    muted: bool,
}

impl Clip {
    fn new(id: &'static str, kind: MediaKind, duration: f64) -> Self {
        Self {
            id,
            kind,
            clip: (None, None),
            duration,
            time: 0.0,
            paused: true,
            volume: 1.0,
            muted: false,
        }
    }

    fn trimmed(mut self, begin: f64, end: f64) -> Self {
        self.clip = (Some(begin), Some(end));
        self
    }
}

impl MediaElement for Clip {
    fn id(&self) -> &str {
        self.id
    }

    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn clip_begin(&self) -> Option<f64> {
        self.clip.0
    }

    fn clip_end(&self) -> Option<f64> {
        self.clip.1
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, time: f64) -> BridgeResult<()> {
        self.time = time;
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn seeking(&self) -> bool {
        false
    }

    fn ended(&self) -> bool {
        self.time >= self.duration
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveEnoughData
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) -> BridgeResult<()> {
        self.volume = volume;
        Ok(())
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) -> BridgeResult<()> {
        self.muted = muted;
        Ok(())
    }

    fn play(&mut self) -> BridgeResult<()> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> BridgeResult<()> {
        self.paused = true;
        Ok(())
    }
}

fn main() {
    let logging = LoggingConfig::for_sequencer(&SequencerConfig::default().with_debug(true))
        .with_format(LogFormat::Compact);
    if let Err(e) = init_logging(logging) {
        eprintln!("{}", e);
        return;
    }

    if let Err(e) = run() {
        eprintln!("Demo failed: {}", e);
    }
}

fn run() -> Result<()> {
    // Subscribe before building: these clips are loaded, so layout runs inside build
    let bus = EventBus::new(64);
    let mut listener = bus.subscribe();

    let mut sequencer = MediaSequencer::builder()
        .config(SequencerConfig::default().with_debug(true))
        .event_bus(bus)
        .id("demo")
        .child(Clip::new("intro", MediaKind::Audio, 5.0))
        .child(Clip::new("talk", MediaKind::Video, 90.0).trimmed(30.0, 40.0))
        .child(Clip::new("outro", MediaKind::Audio, 4.0))
        .build()?;

    println!(
        "Timeline: {:.1}s over {} clips, ready state {:?}",
        sequencer.duration(),
        sequencer.child_count(),
        sequencer.ready_state()
    );
    print_signals("setup", &mut listener);

    sequencer.play()?;
    sequencer.handle_child_event(0, MediaEventKind::Playing)?;
    print_signals("play", &mut listener);

    // Jump into the trimmed talk clip; the clip confirms its seek
    sequencer.set_current_time(8.0)?;
    sequencer.handle_child_event(1, MediaEventKind::Seeked)?;
    print_signals("seek", &mut listener);
    println!(
        "Now at {:.3}s on child {:?} ({})",
        sequencer.current_time(),
        sequencer.active_child(),
        sequencer.current_kind()
    );

    // Skip into the outro; its ended signal finishes the timeline
    sequencer.set_current_time(18.5)?;
    sequencer.handle_child_event(2, MediaEventKind::Seeked)?;
    print_signals("skip", &mut listener);

    sequencer.handle_child_event(2, MediaEventKind::Ended)?;
    print_signals("end", &mut listener);

    println!(
        "Ended: {}, paused: {}, time {:.1}s",
        sequencer.ended(),
        sequencer.paused(),
        sequencer.current_time()
    );

    relay_widget(sequencer.id());
    Ok(())
}

/// A widget that cannot replace its element plays on its own behind a
/// wrapper; every signal the backend raises goes out as the wrapper's.
fn relay_widget(taken: &str) {
    let mut ids = IdGenerator::new("media");
    ids.reserve(taken);
    let widget = MediaWrapper::new(
        Box::new(Clip::new("embed", MediaKind::Video, 212.0)),
        "",
        &mut ids,
    );

    let bus = EventBus::new(8);
    let mut listener = bus.subscribe();
    for kind in [
        MediaEventKind::Play,
        MediaEventKind::Playing,
        MediaEventKind::Pause,
    ] {
        bus.emit(widget.relay(kind)).ok();
    }
    print_signals("widget", &mut listener);
}

fn print_signals(step: &str, listener: &mut Receiver<MediaSignal>) {
    let mut names = Vec::new();
    while let Ok(signal) = listener.try_recv() {
        names.push(signal.to_string());
    }
    println!("[{}] {}", step, names.join(", "));
}
