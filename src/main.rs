use std::sync::Arc;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use getunes::{
    app::App,
    cli, config, error,
    types::{AlbumSeed, Method, SearchType, Seed, SongSeed, TimeRange},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Identity to act as (defaults to GETUNES_IDENTITY)
    #[clap(long, global = true)]
    identity: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Recommend tracks around an artist, song or album
    Recommend(RecommendOptions),

    /// Search the catalog for seeds
    Search(SearchOptions),

    /// Handle the local copy of the Spotify library
    Library(LibraryOptions),

    /// List the playlists getunes created
    Playlists,

    /// Check, save or remove tracks in the Spotify library
    Track(TrackOptions),

    /// Print a fresh access token
    Token,

    /// Run the HTTP endpoints
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Ranking strategy
    #[clap(long, value_enum, default_value = "related")]
    pub method: Method,

    #[clap(flatten)]
    pub seed: SeedArgs,

    /// Number of tracks to return
    #[clap(long, default_value_t = 20)]
    pub num: usize,

    /// Save the tracks as a new private playlist
    #[clap(long)]
    pub create_playlist: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[clap(long)]
    pub artist_id: String,

    #[clap(long)]
    pub artist_name: String,

    #[clap(long, requires = "song_name", conflicts_with = "album_id")]
    pub song_id: Option<String>,

    #[clap(long, requires = "song_id")]
    pub song_name: Option<String>,

    #[clap(long, requires = "album_name")]
    pub album_id: Option<String>,

    #[clap(long, requires = "album_id")]
    pub album_name: Option<String>,
}

impl From<SeedArgs> for Seed {
    fn from(args: SeedArgs) -> Self {
        match (args.song_id, args.song_name, args.album_id, args.album_name) {
            (Some(song_id), Some(song_name), _, _) => Seed::Song {
                artist_id: args.artist_id,
                artist_name: args.artist_name,
                song: SongSeed { song_id, song_name },
            },
            (_, _, Some(album_id), Some(album_name)) => Seed::Album {
                artist_id: args.artist_id,
                artist_name: args.artist_name,
                album: AlbumSeed {
                    album_id,
                    album_name,
                },
            },
            _ => Seed::Artist {
                artist_id: args.artist_id,
                artist_name: args.artist_name,
            },
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    pub query: String,

    /// What to search for
    #[clap(long = "type", value_enum, default_value = "artist")]
    pub kind: SearchType,

    #[clap(long, default_value_t = 10)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct LibraryOptions {
    #[command(subcommand)]
    pub command: LibrarySubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LibrarySubcommand {
    /// Re-import saved tracks and playlist tracks from Spotify
    Import,

    /// Most credited artists in the local library
    TopArtists {
        #[clap(long, default_value_t = 20)]
        limit: usize,
    },

    /// Recently played tracks
    Recent,

    /// Top tracks and artists as computed by Spotify
    Favorites {
        #[clap(long, value_enum, default_value = "medium-term")]
        time_range: TimeRange,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    #[command(subcommand)]
    pub command: TrackSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TrackSubcommand {
    /// Whether the tracks are saved in the library
    IsSaved {
        #[clap(required = true)]
        ids: Vec<String>,
    },

    /// Save tracks to the library
    Save {
        #[clap(required = true)]
        ids: Vec<String>,
    },

    /// Remove tracks from the library
    Remove {
        #[clap(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("getunes=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };
    let app = Arc::new(App::from_config(config));

    match cli.command {
        Command::Auth => cli::auth(app).await,
        Command::Recommend(opt) => {
            cli::recommend(
                &app,
                cli.identity,
                opt.method,
                opt.seed.into(),
                opt.num,
                opt.create_playlist,
            )
            .await
        }
        Command::Search(opt) => {
            cli::search(&app, cli.identity, &opt.query, opt.kind, opt.limit).await
        }
        Command::Library(opt) => match opt.command {
            LibrarySubcommand::Import => cli::import_library(&app, cli.identity).await,
            LibrarySubcommand::TopArtists { limit } => {
                cli::top_artists(&app, cli.identity, limit).await
            }
            LibrarySubcommand::Recent => cli::recent_tracks(&app, cli.identity).await,
            LibrarySubcommand::Favorites { time_range } => {
                cli::favorites(&app, cli.identity, time_range).await
            }
        },
        Command::Playlists => cli::playlists(&app, cli.identity).await,
        Command::Track(opt) => match opt.command {
            TrackSubcommand::IsSaved { ids } => cli::tracks_saved(&app, cli.identity, &ids).await,
            TrackSubcommand::Save { ids } => cli::save_tracks(&app, cli.identity, &ids).await,
            TrackSubcommand::Remove { ids } => cli::remove_tracks(&app, cli.identity, &ids).await,
        },
        Command::Token => cli::access_token(&app, cli.identity).await,
        Command::Serve => cli::serve(app).await,
        Command::Completions(_) => {}
    }
}
