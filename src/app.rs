//! Terminal host state and input handling.
//!
//! File reads run on blocking tasks and report back through an update
//! channel that the draw loop drains with [`App::handle_updates`].

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use crate::config::Settings;
use crate::constants::{async_tasks, player as player_consts};
use crate::error::Result;
use crate::library::{SongLibrary, SongSource};
use crate::player::{AudioTransport, ClockTransport, PlayerController};
use crate::playlist::{Direction, Playlist};
use crate::song_list::{PlayerLink, SongCard};
use crate::types::SongId;

/// Player driven by whichever transport is available.
pub type Player = PlayerController<Box<dyn AudioTransport>>;

/// Results delivered by background tasks.
#[derive(Debug)]
pub enum AppUpdate {
    /// Song cards built from the manifest.
    SongsLoaded(Result<Vec<SongCard>>),
    /// Lyrics file text for a song.
    LyricsLoaded {
        /// Song the lyrics belong to.
        song: SongId,
        /// File contents or the read error.
        result: Result<String>,
    },
    /// Fresh manifest fetched for a navigation step.
    NavigationLoaded {
        /// Requested step.
        direction: Direction,
        /// Parsed manifest or the read error.
        result: Result<Playlist>,
    },
}

/// Top-level view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Song cards.
    SongList,
    /// Player for one song.
    Player,
}

/// Terminal host state.
pub struct App {
    /// Current view.
    pub mode: AppMode,
    /// Settings every component was built from.
    pub settings: Settings,
    /// Cards shown in the song list.
    pub cards: Vec<SongCard>,
    /// Selection in the song list.
    pub song_list_state: ListState,
    /// Player, created when the first song is opened.
    pub player: Option<Player>,
    /// Lyrics scroll offset in lines.
    pub lyrics_scroll: u16,
    /// Background work in flight.
    pub is_loading: bool,
    /// Blocking error modal text.
    pub error_message: Option<String>,
    /// Non-blocking status line text.
    pub status_message: Option<String>,
    /// Quit requested.
    pub should_quit: bool,
    library: Arc<SongLibrary>,
    async_task_tx: mpsc::Sender<AppUpdate>,
    async_task_rx: mpsc::Receiver<AppUpdate>,
    autoplay_at: Option<Instant>,
    autoplay_check_at: Option<Instant>,
}

impl App {
    /// Create the app and start loading the song list.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(settings: Settings) -> Self {
        let (async_task_tx, async_task_rx) = mpsc::channel(async_tasks::CHANNEL_BUFFER_SIZE);

        let mut app = Self {
            mode: AppMode::SongList,
            library: Arc::new(SongLibrary::new(settings.clone())),
            settings,
            cards: Vec::new(),
            song_list_state: ListState::default(),
            player: None,
            lyrics_scroll: 0,
            is_loading: false,
            error_message: None,
            status_message: None,
            should_quit: false,
            async_task_tx,
            async_task_rx,
            autoplay_at: None,
            autoplay_check_at: None,
        };
        app.load_songs();
        app
    }

    /// Whether the main loop should exit.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// (Re)load the song list.
    pub fn load_songs(&mut self) {
        self.is_loading = true;
        let library = Arc::clone(&self.library);
        self.spawn_io(move || library.load_cards(), AppUpdate::SongsLoaded);
    }

    /// Open the player on `link.song`.
    pub fn open_song(&mut self, link: PlayerLink) {
        let PlayerLink { song, autoplay } = link;

        match &mut self.player {
            Some(player) => player.open(song, autoplay),
            None => {
                self.player = Some(PlayerController::new(song, &self.settings, make_transport(), autoplay));
            }
        }

        self.mode = AppMode::Player;
        self.lyrics_scroll = 0;
        self.autoplay_check_at = None;
        self.autoplay_at = autoplay.then(|| Instant::now() + player_consts::AUTOPLAY_DELAY);
        self.load_current_song_files();
    }

    /// Fetch the manifest again and step through it.
    pub fn navigate(&mut self, direction: Direction) {
        if self.player.is_none() {
            return;
        }
        self.is_loading = true;
        let library = Arc::clone(&self.library);
        self.spawn_io(move || library.load_playlist(), move |result| {
            AppUpdate::NavigationLoaded { direction, result }
        });
    }

    /// Apply every update that background tasks have delivered so far.
    pub fn handle_updates(&mut self) {
        loop {
            match self.async_task_rx.try_recv() {
                Ok(update) => self.apply_update(update),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    tracing::debug!("Update channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_update(&mut self, update: AppUpdate) {
        match update {
            AppUpdate::SongsLoaded(result) => {
                self.is_loading = false;
                match result {
                    Ok(cards) => {
                        self.cards = cards;
                        let selected = (!self.cards.is_empty()).then_some(0);
                        self.song_list_state.select(selected);
                    }
                    Err(e) => {
                        tracing::error!("Error loading songs: {e}");
                        self.error_message = Some(format!("Failed to load songs: {e}"));
                    }
                }
            }
            AppUpdate::LyricsLoaded { song, result } => {
                let Some(player) = self.player.as_mut() else {
                    return;
                };
                // Lyrics for a song the user already moved away from.
                if player.song() != &song {
                    return;
                }
                player.load_lyrics(result);
            }
            AppUpdate::NavigationLoaded { direction, result } => {
                self.is_loading = false;
                match result {
                    Ok(playlist) => self.step(&playlist, direction),
                    Err(e) => {
                        tracing::error!("Error reloading manifest: {e}");
                        self.error_message = Some(format!("Failed to load playlist: {e}"));
                    }
                }
            }
        }
    }

    fn step(&mut self, playlist: &Playlist, direction: Direction) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let target = match direction {
            Direction::Next => player.next_in(playlist),
            Direction::Previous => player.previous_in(playlist),
        };
        let Some(nav) = target else {
            self.status_message = Some("Playlist is empty".to_string());
            return;
        };

        tracing::info!("Navigating {direction:?} to {} (#{})", nav.song_id, nav.index);
        player.switch_to(nav.song_id.clone());
        self.lyrics_scroll = 0;
        self.autoplay_at = None;
        self.autoplay_check_at = None;

        if let Some(i) = self.cards.iter().position(|c| c.id == nav.song_id) {
            self.song_list_state.select(Some(i));
        }
        self.load_current_song_files();
    }

    fn load_current_song_files(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let song = player.song().clone();

        if !self.library.image_exists(&song) {
            player.on_image_error();
        }

        let library = Arc::clone(&self.library);
        let requested = song.clone();
        self.spawn_io(move || library.lyrics(&requested), move |result| {
            AppUpdate::LyricsLoaded { song, result }
        });
    }

    /// Advance timers: the autoplay handshake and end-of-track detection.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let Some(player) = self.player.as_mut() else {
            return;
        };

        if self.autoplay_at.is_some_and(|at| now >= at) {
            self.autoplay_at = None;
            player.handle_autoplay();
            self.autoplay_check_at = Some(now + player_consts::AUTOPLAY_CHECK);
        }

        if self.autoplay_check_at.is_some_and(|at| now >= at) {
            self.autoplay_check_at = None;
            player.confirm_autoplay();
        }

        player.poll_ended();
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Any key dismisses a blocking modal.
        if self.error_message.take().is_some() {
            return;
        }
        self.status_message = None;

        match self.mode {
            AppMode::SongList => self.handle_song_list_key(key),
            AppMode::Player => self.handle_player_key(key),
        }
    }

    fn handle_song_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Enter => {
                if let Some(card) = self.selected_card() {
                    let link = card.play_link();
                    self.open_song(link);
                }
            }
            KeyCode::Char('v') => {
                if let Some(card) = self.selected_card() {
                    let link = card.view_link();
                    self.open_song(link);
                }
            }
            KeyCode::Char('r') => self.load_songs(),
            _ => {}
        }
    }

    fn handle_player_key(&mut self, key: KeyEvent) {
        let Some(player) = self.player.as_mut() else {
            self.mode = AppMode::SongList;
            return;
        };

        // A refused autoplay starts on the first interaction.
        if player.on_user_interaction() {
            return;
        }
        if player.notice().is_some() {
            player.dismiss_notice();
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                player.on_pause_requested();
                self.autoplay_at = None;
                self.autoplay_check_at = None;
                self.mode = AppMode::SongList;
            }
            KeyCode::Char(' ') => {
                player.toggle_play();
            }
            KeyCode::Char('n') => self.navigate(Direction::Next),
            KeyCode::Char('p') => self.navigate(Direction::Previous),
            KeyCode::Left => player.on_seek_step(false),
            KeyCode::Right => player.on_seek_step(true),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let tenth = f64::from(c.to_digit(10).unwrap_or(0));
                player.on_seek_fraction(tenth / 10.0);
            }
            KeyCode::Up | KeyCode::Char('k') => self.lyrics_scroll = self.lyrics_scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.lyrics_scroll = self.lyrics_scroll.saturating_add(1),
            _ => {}
        }
    }

    fn move_selection(&mut self, down: bool) {
        if self.cards.is_empty() {
            return;
        }
        let last = self.cards.len() - 1;
        let current = self.song_list_state.selected().unwrap_or(0);
        let next = if down { (current + 1).min(last) } else { current.saturating_sub(1) };
        self.song_list_state.select(Some(next));
    }

    /// Card under the list cursor.
    pub fn selected_card(&self) -> Option<&SongCard> {
        self.song_list_state.selected().and_then(|i| self.cards.get(i))
    }

    fn spawn_io<T, F, W>(&self, task: F, wrap: W)
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
        W: FnOnce(Result<T>) -> AppUpdate + Send + 'static,
    {
        let tx = self.async_task_tx.clone();
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(task)
                .await
                .unwrap_or_else(|e| Err(format!("Background task failed: {e}").into()));
            if tx.send(wrap(result)).await.is_err() {
                tracing::debug!("Update channel closed before delivery");
            }
        });
    }
}

#[cfg(feature = "audio")]
fn make_transport() -> Box<dyn AudioTransport> {
    match crate::player::RodioTransport::new() {
        Ok(transport) => Box::new(transport),
        Err(e) => {
            tracing::warn!("No audio output, falling back to silent playback: {e}");
            Box::new(ClockTransport::new())
        }
    }
}

#[cfg(not(feature = "audio"))]
fn make_transport() -> Box<dyn AudioTransport> {
    Box::new(ClockTransport::new())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::player::{AutoplayState, LyricsState, PlaybackError, PlayState};
    use std::path::Path;
    use std::time::Duration;

    /// Output that loads anything but never plays.
    #[derive(Debug)]
    struct NoOutput;

    impl AudioTransport for NoOutput {
        fn load(&mut self, _source: &Path) -> std::result::Result<(), PlaybackError> {
            Ok(())
        }

        fn play(&mut self) -> std::result::Result<(), PlaybackError> {
            Err(PlaybackError::NoSource)
        }

        fn pause(&mut self) {}

        fn is_paused(&self) -> bool {
            true
        }

        fn position(&self) -> Duration {
            Duration::ZERO
        }

        fn duration(&self) -> Option<Duration> {
            None
        }

        fn seek(&mut self, _position: Duration) {}

        fn has_ended(&self) -> bool {
            false
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn write_songs(dir: &Path) {
        std::fs::write(dir.join("manifest.txt"), "alpha\nbeta\n\ngamma\n").unwrap();
        for (id, title) in [("alpha", "Alpha"), ("beta", "Beta"), ("gamma", "Gamma")] {
            let text = format!("# {title}\n## Credits\nArtist: Band\n## Lyrics\n{id} line\n");
            std::fs::write(dir.join(format!("{id}.txt")), text).unwrap();
        }
        std::fs::write(dir.join("alpha.jpg"), b"jpg").unwrap();
    }

    fn settings_for(dir: &Path) -> Settings {
        Settings {
            base_path: dir.to_path_buf(),
            default_image: dir.join("default.jpg"),
            ..Settings::default()
        }
    }

    async fn next_update(app: &mut App) {
        let update = app.async_task_rx.recv().await.expect("update");
        app.apply_update(update);
    }

    #[tokio::test]
    async fn test_songs_load_into_cards() {
        let dir = tempfile::tempdir().unwrap();
        write_songs(dir.path());
        let mut app = App::new(settings_for(dir.path()));
        next_update(&mut app).await;

        let titles: Vec<&str> = app.cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(app.song_list_state.selected(), Some(0));
        assert!(!app.is_loading);
    }

    #[tokio::test]
    async fn test_missing_manifest_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(settings_for(dir.path()));
        next_update(&mut app).await;
        assert!(app.error_message.as_deref().unwrap_or_default().contains("manifest.txt"));

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit(), "first key only dismisses the error");
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_view_then_navigate_wraps() {
        let dir = tempfile::tempdir().unwrap();
        write_songs(dir.path());
        let mut app = App::new(settings_for(dir.path()));
        next_update(&mut app).await;

        app.handle_key(key(KeyCode::Char('v')));
        assert_eq!(app.mode, AppMode::Player);
        next_update(&mut app).await;
        {
            let player = app.player.as_ref().unwrap();
            assert_eq!(player.title(), "Alpha");
            assert_eq!(player.autoplay(), AutoplayState::Disabled);
            assert_eq!(player.image(), dir.path().join("alpha.jpg"));
        }

        app.handle_key(key(KeyCode::Char('p')));
        next_update(&mut app).await;
        let player = app.player.as_ref().unwrap();
        assert_eq!(player.song().as_str(), "gamma");
        assert_eq!(player.image(), dir.path().join("default.jpg"));
        assert_eq!(app.song_list_state.selected(), Some(2));

        next_update(&mut app).await;
        assert_eq!(app.player.as_ref().unwrap().title(), "Gamma");
    }

    #[tokio::test]
    async fn test_play_toggle_and_back() {
        let dir = tempfile::tempdir().unwrap();
        write_songs(dir.path());
        let mut app = App::new(settings_for(dir.path()));
        next_update(&mut app).await;

        app.handle_key(key(KeyCode::Char('v')));
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.player.as_ref().unwrap().state(), PlayState::Playing);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::SongList);
        assert_eq!(app.player.as_ref().unwrap().state(), PlayState::Paused);
    }

    #[tokio::test]
    async fn test_stale_lyrics_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_songs(dir.path());
        let mut app = App::new(settings_for(dir.path()));
        next_update(&mut app).await;
        app.handle_key(key(KeyCode::Char('v')));

        app.apply_update(AppUpdate::LyricsLoaded {
            song: SongId::from("beta"),
            result: Ok("# Beta".to_string()),
        });
        assert_eq!(app.player.as_ref().unwrap().lyrics(), &LyricsState::Loading);
    }

    #[tokio::test]
    async fn test_any_key_dismisses_play_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_songs(dir.path());
        let settings = settings_for(dir.path());
        let mut app = App::new(settings.clone());
        next_update(&mut app).await;

        let transport: Box<dyn AudioTransport> = Box::new(NoOutput);
        app.player = Some(PlayerController::new(SongId::from("alpha"), &settings, transport, false));
        app.mode = AppMode::Player;

        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.player.as_ref().unwrap().notice(), Some("no audio source loaded"));

        app.handle_key(key(KeyCode::Char('n')));
        let player = app.player.as_ref().unwrap();
        assert!(player.notice().is_none());
        assert_eq!(player.song().as_str(), "alpha", "dismissing key is not also a command");

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }
}
