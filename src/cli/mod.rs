//! # CLI Module
//!
//! User-facing commands. Each command prints with the colored macros and
//! exits through [`error!`](crate::error) on failure; the work itself is
//! delegated to [`App`](crate::app::App).
//!
//! ```text
//! CLI Layer (commands, spinners, tables)
//!     ↓
//! App (workflows)
//!     ↓
//! Recommendation Engine / Stores / Spotify client
//! ```
//!
//! ## Usage
//!
//! ```bash
//! getunes auth                                    # log in, prints the identity
//! getunes library import                          # refresh the local library
//! getunes search "Radiohead"                      # find a seed artist id
//! getunes recommend --artist-id 4Z8W4fKeB5YxbusRsdQVPb \
//!     --artist-name Radiohead --method related --num 30
//! getunes recommend ... --create-playlist         # also save it to Spotify
//! getunes playlists                               # playlists made so far
//! getunes library recent                          # recently played tracks
//! getunes library favorites --time-range long-term
//! getunes track save 4uLU6hMCjMI75M1A2tKUQC       # like a recommendation
//! getunes serve                                   # run the HTTP endpoints
//! ```

mod auth;
mod library;
mod playlists;
mod recommend;
mod search;
mod serve;
mod track;

pub use auth::{access_token, auth};
pub use library::{favorites, import_library, recent_tracks, top_artists};
pub use playlists::playlists;
pub use recommend::recommend;
pub use search::search;
pub use serve::serve;
pub use track::{remove_tracks, save_tracks, tracks_saved};
