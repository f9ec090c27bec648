use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use xiamidl::{
    cli::{self, DownloadOptions},
    config,
    download::Tool,
    utils::{self, NameTemplate},
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

/// SONG, ALBUM and PLAYLIST are IDs taken from the URL of the corresponding
/// Xiami web page.
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
    /// Add songs for download
    #[clap(short = 's', long = "song", value_name = "SONG", num_args = 1.., action = ArgAction::Append)]
    songs: Vec<u64>,

    /// Add all songs in the albums for download
    #[clap(short = 'a', long = "album", value_name = "ALBUM", num_args = 1.., action = ArgAction::Append)]
    albums: Vec<u64>,

    /// Add all songs in the playlists for download
    #[clap(short = 'p', long = "playlist", value_name = "PLAYLIST", num_args = 1.., action = ArgAction::Append)]
    playlists: Vec<u64>,

    /// Overwrite existing files without prompt
    #[clap(short, long)]
    force: bool,

    /// Change the download tool
    #[clap(short, long, value_enum, default_value_t = Tool::Http)]
    tool: Tool,

    /// Skip adding ID3 tags
    #[clap(long)]
    no_tag: bool,

    /// Save downloads to the directory
    #[clap(long)]
    directory: Option<PathBuf>,

    /// File name template
    #[clap(
        long,
        default_value = config::DEFAULT_NAME_TEMPLATE,
        value_parser = utils::parse_name_template
    )]
    name_template: NameTemplate,

    /// Keep time tags in lyrics
    #[clap(long)]
    lrc_timetag: bool,

    /// Make downloads faster, but Xiami may ban your account
    #[clap(long)]
    no_wait: bool,

    /// VIP account email
    #[clap(short = 'u', long)]
    username: Option<String>,

    /// VIP account password
    #[clap(short = 'w', long)]
    password: Option<String>,

    /// Print shell completions and exit
    #[clap(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    if let Err(e) = config::load_env() {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    cli::download(DownloadOptions {
        songs: cli.songs,
        albums: cli.albums,
        playlists: cli.playlists,
        force: cli.force,
        tool: cli.tool,
        no_tag: cli.no_tag,
        directory: cli.directory.unwrap_or_else(config::download_directory),
        name_template: cli.name_template,
        lrc_timetag: cli.lrc_timetag,
        no_wait: cli.no_wait,
        username: cli.username.or_else(config::vip_username),
        password: cli.password.or_else(config::vip_password),
    });
}
