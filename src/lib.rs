//! Getunes Library
//!
//! Recommends Spotify tracks a listener has not heard yet. Given a seed
//! artist, song or album, candidates are collected from playlists, the
//! artist's discography or Spotify's own recommendations, filtered against
//! everything already in the listener's library and ranked by popularity.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints served by the local server
//! - `app` - Wiring of all components and the outer workflows
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loaded once from the environment
//! - `error` - Error taxonomy
//! - `management` - Persisted users and libraries
//! - `recommend` - The recommendation engine
//! - `server` - Local HTTP server
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```ignore
//! use getunes::{app::App, config};
//!
//! #[tokio::main]
//! async fn main() -> getunes::Res<()> {
//!     config::load_env().await?;
//!     let app = App::from_config(config::Config::from_env()?);
//!     let top = app.top_artists("some-identity").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod recommend;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used across the crate.
pub type Res<T> = std::result::Result<T, error::Error>;

/// Prints an informational message with a blue bullet point.
///
/// ```ignore
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for the command-line layer: library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
