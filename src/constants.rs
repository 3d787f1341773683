//! Application constants.
//!
//! Centralizes file names, markers and timing values shared by the library
//! and the terminal host.

/// Lyrics file format markers and song file naming.
pub mod files {
    /// Line that opens the credits block of a lyrics file.
    pub const CREDITS_MARKER: &str = "## Credits";

    /// Line that opens the lyrics block of a lyrics file.
    pub const LYRICS_MARKER: &str = "## Lyrics";

    /// Manifest file name inside the song directory.
    pub const MANIFEST_FILE: &str = "manifest.txt";

    /// Audio file extension.
    pub const AUDIO_EXT: &str = "mp3";

    /// Lyrics file extension.
    pub const LYRICS_EXT: &str = "txt";

    /// Cover image extension.
    pub const IMAGE_EXT: &str = "jpg";
}

/// Default settings values.
pub mod defaults {
    /// Directory holding the manifest and song files.
    pub const BASE_PATH: &str = "../songs/";

    /// Image shown when a song has no cover.
    pub const DEFAULT_IMAGE: &str = "../default-image.jpg";

    /// Seek step in seconds for the arrow keys.
    pub const SEEK_STEP_SECS: u64 = 5;
}

/// Player display and autoplay constants.
pub mod player {
    use std::time::Duration;

    /// Button glyph shown while paused.
    pub const PLAY_ICON: &str = "▶️";

    /// Button glyph shown while playing.
    pub const PAUSE_ICON: &str = "⏸️";

    /// Placeholder shown when the lyrics file cannot be loaded.
    pub const LYRICS_ERROR: &str = "Error loading lyrics";

    /// Time label used when the duration is not known.
    pub const UNKNOWN_TIME: &str = "--:--";

    /// Notice shown when autoplay was refused.
    pub const AUTOPLAY_FAILED: &str = "AUTOPLAY FAILED: press any key to start the song.";

    /// Delay between opening the player and the autoplay attempt.
    pub const AUTOPLAY_DELAY: Duration = Duration::from_millis(500);

    /// Delay between the autoplay attempt and checking that it took.
    pub const AUTOPLAY_CHECK: Duration = Duration::from_millis(100);
}

/// Player link format.
pub mod links {
    /// Page that hosts the player.
    pub const PLAYER_PAGE: &str = "player.html";

    /// Query key that requests autoplay.
    pub const PLAY_PARAM: &str = "play";
}

/// Async task constants.
pub mod async_tasks {
    /// Channel buffer size for async task communication.
    pub const CHANNEL_BUFFER_SIZE: usize = 10;
}

/// UI layout constants.
pub mod ui {
    /// Width of the song list pane in percent.
    pub const SONG_LIST_PERCENT: u16 = 40;

    /// Maximum display width of a song title in the list.
    pub const MAX_TITLE_WIDTH: usize = 40;
}
