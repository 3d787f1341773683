//! Dump parsed song metadata or a manifest as JSON.
//!
//! Usage:
//!   `cargo run --bin dump_song -- <song.txt>`
//!   `cargo run --bin dump_song -- --manifest <manifest.txt>`
//!   `cargo run --bin dump_song -- --cards <song_dir>`
//!
//! Useful for checking how a lyrics file will be split into title, credits
//! and lyrics before publishing it.

use std::env;
use std::path::{Path, PathBuf};

use minidemo::config::{Settings, SettingsOverrides};
use minidemo::library::SongLibrary;
use minidemo::metadata::MetadataParser;
use minidemo::playlist::Playlist;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("dump_song", String::as_str);

    let settings = Settings::load().unwrap_or_else(|e| fail(&format!("Failed to load settings: {e}")));

    match args.get(1..).unwrap_or_default() {
        [flag, path] if flag == "--manifest" => {
            let text = read(Path::new(path));
            print_json(&Playlist::from_manifest(&text));
        }
        [flag, dir] if flag == "--cards" => {
            let library = SongLibrary::new(settings.with_overrides(SettingsOverrides {
                base_path: Some(PathBuf::from(dir)),
                ..SettingsOverrides::default()
            }));
            let cards = library
                .load_cards()
                .unwrap_or_else(|e| fail(&format!("Failed to load cards: {e}")));
            print_json(&cards);
        }
        [path] => {
            let text = read(Path::new(path));
            print_json(&MetadataParser::new(settings.markers).parse(&text));
        }
        _ => {
            eprintln!("Usage: {program} <song.txt>");
            eprintln!("       {program} --manifest <manifest.txt>");
            eprintln!("       {program} --cards <song_dir>");
            std::process::exit(1);
        }
    }
}

fn read(path: &Path) -> String {
    fs_err::read_to_string(path).unwrap_or_else(|e| fail(&e.to_string()))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(&format!("Failed to serialize: {e}")),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
