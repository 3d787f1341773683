//! `minidemo` - a mini player for demo songs.
//!
//! Parses lyrics files into title, credits and lyric lines, navigates a
//! manifest-defined playlist with wraparound, and drives playback through an
//! explicit command interface. A terminal host shows the song list and player.

// Re-export public modules for use in integration tests and as a library
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod library;
pub mod metadata;
pub mod player;
pub mod playlist;
pub mod song_list;
pub mod types;
pub mod ui;
