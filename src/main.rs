use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use likesync::{cli, config, error};

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
    /// Only print warnings, errors and requested listings
    #[clap(long, short, global = true)]
    quiet: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Add liked songs missing from a playlist, newest first
    Merge(MergeOptions),

    /// Interactive menu
    Menu,

    /// Save a JSON snapshot of your liked songs
    Backup(BackupOptions),

    /// List your liked songs
    Liked(LikedOptions),

    /// List your playlists
    Playlists,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct MergeOptions {
    /// Target playlist id (prompted for when omitted)
    #[clap(long)]
    pub playlist: Option<String>,

    /// Do not ask for confirmation before adding songs
    #[clap(long, short)]
    pub yes: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct BackupOptions {
    /// Directory the snapshot is written to
    #[clap(long, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct LikedOptions {
    /// Number of songs to show
    #[clap(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    likesync::set_quiet(cli.quiet);

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
        Err(e) => error!("Invalid configuration: {}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(&config).await,
        Command::Merge(opt) => cli::merge(&config, opt.playlist, opt.yes).await,
        Command::Menu => cli::menu(&config).await,
        Command::Backup(opt) => cli::backup(&config, &opt.dir).await,
        Command::Liked(opt) => cli::liked(&config, opt.limit).await,
        Command::Playlists => cli::playlists(&config).await,
        Command::Completions(_) => {}
    }
}
