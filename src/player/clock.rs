//! Silent transport that only keeps time.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{AudioTransport, PlaybackError};

/// Tracks a playback position against the wall clock without producing sound.
///
/// Used when no audio device is available, and for previewing lyrics and
/// navigation. The duration is unknown unless given up front.
#[derive(Debug, Default)]
pub struct ClockTransport {
    source: Option<PathBuf>,
    duration: Option<Duration>,
    /// Position accumulated up to the last pause or seek.
    offset: Duration,
    /// Set while playing.
    started: Option<Instant>,
}

impl ClockTransport {
    /// Create a transport with an unknown duration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport whose tracks last `duration`.
    pub fn with_duration(duration: Duration) -> Self {
        Self { duration: Some(duration), ..Self::default() }
    }

    /// Currently loaded source.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn raw_position(&self) -> Duration {
        self.offset + self.started.map_or(Duration::ZERO, |t| t.elapsed())
    }
}

impl AudioTransport for ClockTransport {
    fn load(&mut self, source: &Path) -> Result<(), PlaybackError> {
        self.source = Some(source.to_path_buf());
        self.offset = Duration::ZERO;
        self.started = None;
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.source.is_none() {
            return Err(PlaybackError::NoSource);
        }
        // Playing an ended track starts it over.
        if self.has_ended() {
            self.offset = Duration::ZERO;
            self.started = None;
        }
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.offset = self.position();
        self.started = None;
    }

    fn is_paused(&self) -> bool {
        self.started.is_none()
    }

    fn position(&self) -> Duration {
        let raw = self.raw_position();
        self.duration.map_or(raw, |total| raw.min(total))
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn seek(&mut self, position: Duration) {
        self.offset = position;
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }

    fn has_ended(&self) -> bool {
        self.duration.is_some_and(|total| self.raw_position() >= total)
    }
}
