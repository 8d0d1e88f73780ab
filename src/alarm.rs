//! The audio signal raised when a countdown expires.
//!
//! An [`Alarm`] is fire-and-forget: none of its methods report failure.
//! Implementations log what went wrong and carry on, so a missing sound
//! device can never hold up the expiry transition.

use std::io::Write;
use tracing::warn;

/// A single pre-loaded sound with play, pause and rewind controls.
pub trait Alarm {
    /// Starts (or resumes) playback.
    fn play(&mut self);

    /// Pauses playback, keeping the position.
    fn pause(&mut self);

    /// Moves the playback position back to the start.
    fn rewind(&mut self);
}

impl<A: Alarm + ?Sized> Alarm for Box<A> {
    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn rewind(&mut self) {
        (**self).rewind();
    }
}

/// Rings the terminal bell (ASCII BEL) on stdout.
///
/// Pausing and rewinding are no-ops, the bell has no duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl Alarm for TerminalBell {
    fn play(&mut self) {
        let mut stdout = std::io::stdout();
        if let Err(err) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            warn!(error = %err, "failed to ring terminal bell");
        }
    }

    fn pause(&mut self) {}

    fn rewind(&mut self) {}
}

/// An alarm that makes no sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlarm;

impl Alarm for SilentAlarm {
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn rewind(&mut self) {}
}

/// Plays several alarms together, in order.
#[derive(Default)]
pub struct AlarmSet {
    alarms: Vec<Box<dyn Alarm + Send>>,
}

impl AlarmSet {
    /// Creates an empty set, equivalent to [`SilentAlarm`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alarm to the set.
    pub fn with(mut self, alarm: impl Alarm + Send + 'static) -> Self {
        self.alarms.push(Box::new(alarm));
        self
    }

    /// Number of alarms in the set.
    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

impl Alarm for AlarmSet {
    fn play(&mut self) {
        self.alarms.iter_mut().for_each(|alarm| alarm.play());
    }

    fn pause(&mut self) {
        self.alarms.iter_mut().for_each(|alarm| alarm.pause());
    }

    fn rewind(&mut self) {
        self.alarms.iter_mut().for_each(|alarm| alarm.rewind());
    }
}

/// One call made on a [`RecordingAlarm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEvent {
    /// `play()` was called.
    Play,
    /// `pause()` was called.
    Pause,
    /// `rewind()` was called.
    Rewind,
}

/// An alarm that remembers every call made on it.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlarm {
    events: Vec<AlarmEvent>,
}

impl RecordingAlarm {
    /// Creates an alarm with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call, oldest first.
    pub fn events(&self) -> &[AlarmEvent] {
        &self.events
    }

    /// How many times `play()` was called.
    pub fn plays(&self) -> usize {
        self.events
            .iter()
            .filter(|event| **event == AlarmEvent::Play)
            .count()
    }
}

impl Alarm for RecordingAlarm {
    fn play(&mut self) {
        self.events.push(AlarmEvent::Play);
    }

    fn pause(&mut self) {
        self.events.push(AlarmEvent::Pause);
    }

    fn rewind(&mut self) {
        self.events.push(AlarmEvent::Rewind);
    }
}

#[cfg(feature = "sound")]
pub use sound::SoundFileAlarm;

#[cfg(feature = "sound")]
mod sound {
    use super::Alarm;
    use rodio::{Decoder, OutputStream, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tracing::{debug, warn};

    type SinkSlot = Arc<Mutex<Option<Arc<Sink>>>>;

    /// Plays an audio file through the default output device.
    ///
    /// Playback runs on its own thread, which owns the output stream for as
    /// long as the sound lasts.
    #[derive(Clone)]
    pub struct SoundFileAlarm {
        path: PathBuf,
        volume: f32,
        sink: SinkSlot,
    }

    impl SoundFileAlarm {
        /// Creates an alarm for the file at `path`, volume clamped to `0.0..=1.0`.
        pub fn new(path: impl Into<PathBuf>, volume: f32) -> Self {
            Self {
                path: path.into(),
                volume: volume.clamp(0.0, 1.0),
                sink: Arc::new(Mutex::new(None)),
            }
        }

        /// The sound file.
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn current(&self) -> Option<Arc<Sink>> {
            self.sink.lock().ok().and_then(|slot| slot.clone())
        }
    }

    impl std::fmt::Debug for SoundFileAlarm {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SoundFileAlarm")
                .field("path", &self.path)
                .field("volume", &self.volume)
                .finish_non_exhaustive()
        }
    }

    impl Alarm for SoundFileAlarm {
        fn play(&mut self) {
            if let Some(sink) = self.current() {
                if !sink.empty() {
                    sink.play();
                    return;
                }
            }

            let path = self.path.clone();
            let volume = self.volume;
            let slot = Arc::clone(&self.sink);
            std::thread::spawn(move || {
                let Ok((_stream, handle)) = OutputStream::try_default() else {
                    warn!("no audio output device available");
                    return;
                };
                let sink = match Sink::try_new(&handle) {
                    Ok(sink) => sink,
                    Err(err) => {
                        warn!(error = %err, "failed to open audio sink");
                        return;
                    }
                };
                let source = match File::open(&path)
                    .map_err(|err| err.to_string())
                    .and_then(|file| {
                        Decoder::new(BufReader::new(file)).map_err(|err| err.to_string())
                    }) {
                    Ok(source) => source,
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "failed to load alarm sound");
                        return;
                    }
                };

                sink.set_volume(volume);
                sink.append(source);
                let sink = Arc::new(sink);
                if let Ok(mut current) = slot.lock() {
                    *current = Some(Arc::clone(&sink));
                }
                debug!(path = %path.display(), "alarm sound playing");
                sink.sleep_until_end();

                if let Ok(mut current) = slot.lock() {
                    if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, &sink)) {
                        *current = None;
                    }
                }
            });
        }

        fn pause(&mut self) {
            if let Some(sink) = self.current() {
                sink.pause();
            }
        }

        fn rewind(&mut self) {
            let taken = self.sink.lock().ok().and_then(|mut slot| slot.take());
            if let Some(sink) = taken {
                sink.stop();
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_new_clamps_volume() {
            let alarm = SoundFileAlarm::new("/tmp/ding.ogg", 2.0);
            assert_eq!(alarm.path(), Path::new("/tmp/ding.ogg"));
            assert_eq!(alarm.volume, 1.0);
            assert_eq!(SoundFileAlarm::new("/tmp/ding.ogg", -0.5).volume, 0.0);
            assert!(format!("{alarm:?}").contains("ding.ogg"));
        }

        #[test]
        fn test_missing_file_plays_nothing() {
            let mut alarm = SoundFileAlarm::new("/nonexistent/countdown/alarm.ogg", 0.5);
            alarm.play();
            // The playback thread gives up on its own, with or without a device.
            std::thread::sleep(Duration::from_millis(200));
            assert!(alarm.current().is_none());

            alarm.pause();
            alarm.rewind();
            assert!(alarm.current().is_none());

            // A second play after a failed one starts over without panicking.
            alarm.play();
            alarm.rewind();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_alarm() {
        let mut alarm = RecordingAlarm::new();
        alarm.play();
        alarm.pause();
        alarm.rewind();
        assert_eq!(
            alarm.events(),
            &[AlarmEvent::Play, AlarmEvent::Pause, AlarmEvent::Rewind]
        );
        assert_eq!(alarm.plays(), 1);
    }

    #[test]
    fn test_alarm_set_forwards_to_all() {
        let mut set = AlarmSet::new().with(SilentAlarm).with(SilentAlarm);
        assert_eq!(set.len(), 2);
        set.play();
        set.pause();
        set.rewind();
        assert!(AlarmSet::new().is_empty());
    }

    #[test]
    fn test_boxed_alarm() {
        let mut alarm: Box<dyn Alarm + Send> = Box::new(SilentAlarm);
        alarm.play();
        alarm.rewind();
    }
}
