//! Player controller.
//!
//! The controller owns the play/pause state, the loaded song's metadata and
//! the autoplay handshake. The host UI calls its command methods
//! (`on_play_requested`, `on_seek`, `on_track_ended`, ...) and reads back the
//! display state. Actual audio output goes through an [`AudioTransport`].

mod clock;
#[cfg(feature = "audio")]
mod rodio_transport;

pub use clock::ClockTransport;
#[cfg(feature = "audio")]
pub use rodio_transport::RodioTransport;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::Settings;
use crate::constants::player as consts;
use crate::metadata::{MetadataParser, SongMetadata};
use crate::playlist::{Direction, Navigation, Playlist};
use crate::song_list::song_id_from_fragment;
use crate::types::{SongAssets, SongId};

/// Failures reported by an audio transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Playback needs a user gesture first.
    #[error("playback blocked until the user interacts")]
    Blocked,
    /// Nothing has been loaded.
    #[error("no audio source loaded")]
    NoSource,
    /// The audio source could not be opened or decoded.
    #[error("cannot open {path:?}: {message}")]
    Source {
        /// Audio file path.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
    /// The output device failed.
    #[error("audio device error: {0}")]
    Device(String),
}

/// The platform media element: whatever actually plays the audio.
pub trait AudioTransport {
    /// Load a new audio source, paused at the start.
    fn load(&mut self, source: &Path) -> Result<(), PlaybackError>;

    /// Start or resume playback.
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause playback.
    fn pause(&mut self);

    /// Whether playback is currently paused (or stopped).
    fn is_paused(&self) -> bool;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Total length, when known.
    fn duration(&self) -> Option<Duration>;

    /// Jump to `position`.
    fn seek(&mut self, position: Duration);

    /// Whether playback reached the end of the source.
    fn has_ended(&self) -> bool;
}

impl<T: AudioTransport + ?Sized> AudioTransport for Box<T> {
    fn load(&mut self, source: &Path) -> Result<(), PlaybackError> {
        (**self).load(source)
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn position(&self) -> Duration {
        (**self).position()
    }

    fn duration(&self) -> Option<Duration> {
        (**self).duration()
    }

    fn seek(&mut self, position: Duration) {
        (**self).seek(position);
    }

    fn has_ended(&self) -> bool {
        (**self).has_ended()
    }
}

/// Play/pause state as shown on the play button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// Not playing.
    Paused,
    /// Playing.
    Playing,
}

/// Progress of the autoplay handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayState {
    /// Autoplay was not requested.
    Disabled,
    /// Autoplay requested, not yet attempted.
    Scheduled,
    /// Play was called; waiting to confirm it took.
    Attempted,
    /// Autoplay was refused; the next user interaction starts playback.
    AwaitingGesture,
    /// Autoplay finished one way or another.
    Settled,
}

/// Lyrics loading state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsState {
    /// Not loaded yet.
    Loading,
    /// Parsed lyrics file.
    Loaded(SongMetadata),
    /// The lyrics file could not be read.
    Failed,
}

/// Progress bar contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Played share in percent, `0.0..=100.0`.
    pub percent: f64,
    /// Current position label.
    pub current: String,
    /// Duration label.
    pub duration: String,
}

/// Drives one song at a time through an [`AudioTransport`].
#[derive(Debug)]
pub struct PlayerController<T: AudioTransport> {
    transport: T,
    parser: MetadataParser,
    base_settings: Settings,
    song: SongId,
    assets: SongAssets,
    image: PathBuf,
    image_fallback_used: bool,
    state: PlayState,
    autoplay: AutoplayState,
    lyrics: LyricsState,
    notice: Option<String>,
}

impl<T: AudioTransport> PlayerController<T> {
    /// Create a controller and load `song`.
    ///
    /// `song` may carry a trailing `?query` (as taken from a link fragment);
    /// it is stripped.
    pub fn new(song: SongId, settings: &Settings, transport: T, autoplay: bool) -> Self {
        let assets = settings.assets(&song);
        let mut controller = Self {
            transport,
            parser: MetadataParser::new(settings.markers.clone()),
            base_settings: settings.clone(),
            image: assets.image.clone(),
            assets,
            song: song.clone(),
            image_fallback_used: false,
            state: PlayState::Paused,
            autoplay: AutoplayState::Disabled,
            lyrics: LyricsState::Loading,
            notice: None,
        };
        controller.open(song, autoplay);
        controller
    }

    /// Load `song` as a fresh player page: paused, with autoplay optionally scheduled.
    pub fn open(&mut self, song: SongId, autoplay: bool) {
        let song = song_id_from_fragment(song.as_str());
        self.transport.pause();
        self.assets = self.base_settings.assets(&song);
        self.image = self.assets.image.clone();
        self.image_fallback_used = false;
        self.state = PlayState::Paused;
        self.lyrics = LyricsState::Loading;
        self.notice = None;
        self.autoplay = if autoplay { AutoplayState::Scheduled } else { AutoplayState::Disabled };

        tracing::info!("Opening song {song} (autoplay: {autoplay})");
        if let Err(e) = self.transport.load(&self.assets.audio) {
            tracing::warn!("Failed to load audio for {song}: {e}");
            self.notice = Some(e.to_string());
        }
        self.song = song;
    }

    /// Move to another song, carrying over the play state.
    pub fn switch_to(&mut self, song: SongId) {
        let was_playing = self.state == PlayState::Playing;
        self.open(song, false);
        if was_playing {
            self.set_play_state(true);
        }
    }

    /// Song after the current one in `playlist`.
    pub fn next_in(&self, playlist: &Playlist) -> Option<Navigation> {
        playlist.navigate(&self.song, Direction::Next)
    }

    /// Song before the current one in `playlist`.
    pub fn previous_in(&self, playlist: &Playlist) -> Option<Navigation> {
        playlist.navigate(&self.song, Direction::Previous)
    }

    /// Apply the outcome of fetching the lyrics file.
    pub fn load_lyrics<E: std::fmt::Display>(&mut self, fetched: Result<String, E>) {
        self.lyrics = match fetched {
            Ok(text) => LyricsState::Loaded(self.parser.parse(&text)),
            Err(e) => {
                tracing::warn!("Failed to load lyrics for {}: {e}", self.song);
                LyricsState::Failed
            }
        };
    }

    /// The cover image failed to load: switch to the default image once.
    pub fn on_image_error(&mut self) {
        if self.image_fallback_used {
            return;
        }
        self.image_fallback_used = true;
        self.image = self.base_settings.default_image.clone();
    }

    /// Play button pressed while paused.
    pub fn on_play_requested(&mut self) -> bool {
        self.set_play_state(true)
    }

    /// Pause requested.
    pub fn on_pause_requested(&mut self) {
        self.set_play_state(false);
    }

    /// Play button pressed: play if paused, pause if playing.
    pub fn toggle_play(&mut self) -> bool {
        let should_play = self.transport.is_paused();
        self.set_play_state(should_play)
    }

    /// Play or pause. Returns whether the player ends up playing.
    pub fn set_play_state(&mut self, should_play: bool) -> bool {
        if !should_play {
            self.transport.pause();
            self.state = PlayState::Paused;
            return false;
        }

        match self.transport.play() {
            Ok(()) => {
                self.state = PlayState::Playing;
                true
            }
            Err(e) => {
                tracing::warn!("Play failed for {}: {e}", self.song);
                self.state = PlayState::Paused;
                self.notice = Some(e.to_string());
                false
            }
        }
    }

    /// Seek to `position`, clamped to the duration when it is known.
    pub fn on_seek(&mut self, position: Duration) {
        let target = self.transport.duration().map_or(position, |total| position.min(total));
        tracing::debug!("Seek to {target:?}");
        self.transport.seek(target);
    }

    /// Seek to a fraction of the duration, as a click on the progress bar does.
    ///
    /// Does nothing while the duration is unknown.
    pub fn on_seek_fraction(&mut self, fraction: f64) {
        let Some(total) = self.transport.duration() else {
            return;
        };
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.on_seek(total.mul_f64(fraction));
    }

    /// Seek one step forward or back.
    pub fn on_seek_step(&mut self, forward: bool) {
        let step = self.base_settings.seek_step;
        let position = self.transport.position();
        let target = if forward { position + step } else { position.saturating_sub(step) };
        self.on_seek(target);
    }

    /// The track finished playing.
    pub fn on_track_ended(&mut self) {
        tracing::debug!("Track ended: {}", self.song);
        self.transport.pause();
        self.state = PlayState::Paused;
    }

    /// First autoplay step: try to start playback.
    pub fn handle_autoplay(&mut self) {
        if self.autoplay != AutoplayState::Scheduled {
            return;
        }
        if self.set_play_state(true) {
            self.autoplay = AutoplayState::Attempted;
        } else {
            self.await_gesture();
        }
    }

    /// Second autoplay step: make sure playback really started.
    pub fn confirm_autoplay(&mut self) {
        if self.autoplay != AutoplayState::Attempted {
            return;
        }
        if self.transport.is_paused() {
            self.state = PlayState::Paused;
            self.await_gesture();
        } else {
            self.autoplay = AutoplayState::Settled;
        }
    }

    /// Any user interaction. Starts playback if autoplay was refused.
    ///
    /// Returns `true` when the interaction was consumed by the autoplay fallback.
    pub fn on_user_interaction(&mut self) -> bool {
        if self.autoplay != AutoplayState::AwaitingGesture {
            return false;
        }
        self.autoplay = AutoplayState::Settled;
        self.notice = None;
        self.set_play_state(true);
        true
    }

    fn await_gesture(&mut self) {
        tracing::info!("Autoplay refused for {}; waiting for user interaction", self.song);
        self.autoplay = AutoplayState::AwaitingGesture;
        self.notice = Some(consts::AUTOPLAY_FAILED.to_string());
    }

    /// Check the transport for the end of the track; returns `true` once it ended.
    pub fn poll_ended(&mut self) -> bool {
        if self.state == PlayState::Playing && self.transport.has_ended() {
            self.on_track_ended();
            return true;
        }
        false
    }

    /// Current song.
    pub const fn song(&self) -> &SongId {
        &self.song
    }

    /// Files of the current song.
    pub const fn assets(&self) -> &SongAssets {
        &self.assets
    }

    /// Image to display (cover or default).
    pub fn image(&self) -> &Path {
        &self.image
    }

    /// Play/pause state.
    pub const fn state(&self) -> PlayState {
        self.state
    }

    /// Autoplay handshake state.
    pub const fn autoplay(&self) -> AutoplayState {
        self.autoplay
    }

    /// Lyrics loading state.
    pub const fn lyrics(&self) -> &LyricsState {
        &self.lyrics
    }

    /// Message for the user, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Clear the message for the user.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Whether fraction seeks can land anywhere: the duration is known.
    pub fn can_jump(&self) -> bool {
        self.transport.duration().is_some_and(|d| !d.is_zero())
    }

    /// Transport in use.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Song title, empty until the lyrics file is loaded.
    pub fn title(&self) -> &str {
        match &self.lyrics {
            LyricsState::Loaded(meta) => &meta.title,
            LyricsState::Loading | LyricsState::Failed => "",
        }
    }

    /// Credits formatted for display.
    pub fn credit_lines(&self) -> Vec<String> {
        match &self.lyrics {
            LyricsState::Loaded(meta) => meta.credits.display_lines(),
            LyricsState::Loading | LyricsState::Failed => Vec::new(),
        }
    }

    /// Lyric lines, or the error placeholder.
    pub fn lyric_lines(&self) -> Vec<String> {
        match &self.lyrics {
            LyricsState::Loaded(meta) => meta.lyric_lines.clone(),
            LyricsState::Failed => vec![consts::LYRICS_ERROR.to_string()],
            LyricsState::Loading => Vec::new(),
        }
    }

    /// Glyph for the play button.
    pub const fn play_icon(&self) -> &'static str {
        match self.state {
            PlayState::Paused => consts::PLAY_ICON,
            PlayState::Playing => consts::PAUSE_ICON,
        }
    }

    /// Progress bar percentage and time labels.
    pub fn progress(&self) -> Progress {
        let position = self.transport.position();
        match self.transport.duration().filter(|d| !d.is_zero()) {
            Some(total) => Progress {
                percent: (position.as_secs_f64() / total.as_secs_f64() * 100.0).clamp(0.0, 100.0),
                current: format_time(position),
                duration: format_time(total),
            },
            None => Progress {
                percent: 0.0,
                current: format_time(position),
                duration: consts::UNKNOWN_TIME.to_string(),
            },
        }
    }
}

/// Format a duration as `M:SS`, rounding down.
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
