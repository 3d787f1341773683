//! Audio output through `rodio`.

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{AudioTransport, PlaybackError};

/// Plays mp3 files on the default output device.
pub struct RodioTransport {
    // Dropping the stream silences the sink.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    source: Option<PathBuf>,
    duration: Option<Duration>,
}

impl RodioTransport {
    /// Open the default output device.
    pub fn new() -> Result<Self, PlaybackError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::Device(e.to_string()))?;
        Ok(Self { _stream: stream, handle, sink: None, source: None, duration: None })
    }

    fn open_sink(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let source_err = |message: String| PlaybackError::Source { path: path.to_path_buf(), message };

        let file = fs_err::File::open(path).map_err(|e| source_err(e.to_string()))?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| source_err(e.to_string()))?;
        let duration = decoder.total_duration();

        let sink = Sink::try_new(&self.handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        sink.pause();
        sink.append(decoder);

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.duration = duration;
        Ok(())
    }
}

impl AudioTransport for RodioTransport {
    fn load(&mut self, source: &Path) -> Result<(), PlaybackError> {
        self.source = Some(source.to_path_buf());
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.duration = None;
        self.open_sink(source)
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let Some(source) = self.source.clone() else {
            return Err(PlaybackError::NoSource);
        };
        // A drained sink has nothing left to play; start the file over.
        if self.sink.as_ref().map_or(true, Sink::empty) {
            self.open_sink(&source)?;
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.sink.as_ref().map_or(true, |s| s.is_paused() || s.empty())
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn seek(&mut self, position: Duration) {
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.try_seek(position) {
                tracing::warn!("Seek to {position:?} failed: {e}");
            }
        }
    }

    fn has_ended(&self) -> bool {
        self.sink.as_ref().is_some_and(Sink::empty)
    }
}
