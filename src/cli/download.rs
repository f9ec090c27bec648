use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    download::{self, Downloader, Tool},
    error, info,
    management::TrackPositionManager,
    success, tags,
    types::{Track, TrackTableRow},
    utils::{self, NameTemplate},
    warning,
    xiami::{
        ListKind, RequestConfig, XiamiClient, auth, build_url_list, location::decode_location,
        playlist,
    },
};

/// Pause between tracks. Shorter pauses get accounts banned.
pub const WAIT_BETWEEN_TRACKS: Duration = Duration::from_secs(10);

/// Everything the download command needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub songs: Vec<u64>,
    pub albums: Vec<u64>,
    pub playlists: Vec<u64>,
    pub force: bool,
    pub tool: Tool,
    pub no_tag: bool,
    pub directory: PathBuf,
    pub name_template: NameTemplate,
    pub lrc_timetag: bool,
    pub no_wait: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Resolves, downloads and tags every requested track.
pub fn download(opts: DownloadOptions) {
    let mut client = match XiamiClient::from_config() {
        Ok(client) => client,
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    };

    let downloader = match download::for_tool(opts.tool) {
        Ok(downloader) => downloader,
        Err(e) => error!("Cannot create {} downloader. Err: {}", opts.tool, e),
    };

    let mut urls = Vec::new();
    urls.extend(build_url_list(ListKind::Song, client.base_url(), &opts.songs));
    urls.extend(build_url_list(ListKind::Album, client.base_url(), &opts.albums));
    urls.extend(build_url_list(
        ListKind::Playlist,
        client.base_url(),
        &opts.playlists,
    ));

    if urls.is_empty() {
        warning!("Nothing to download. Pass --song, --album or --playlist.");
        return;
    }

    let vip = match (&opts.username, &opts.password) {
        (Some(username), Some(password)) => login(&mut client, username, password),
        _ => false,
    };

    let mut tracks: Vec<Track> = urls
        .iter()
        .flat_map(|url| playlist::get_playlist(&client, url))
        .collect();

    info!("{} file(s) to download", tracks.len());
    if tracks.is_empty() {
        return;
    }
    println!("{}", Table::new(tracks.iter().map(TrackTableRow::from)));

    for track in tracks.iter_mut() {
        resolve_download_url(&client, track, vip);

        if !opts.no_wait {
            wait(WAIT_BETWEEN_TRACKS);
        }
    }

    let total = tracks.len();
    let mut positions = TrackPositionManager::new();
    let mut downloaded_count = 0;

    for (index, mut track) in tracks.into_iter().enumerate() {
        let Some(url) = track.url.clone() else {
            warning!("[{}/{}] Skipping {}: no download url", index + 1, total, track.title);
            continue;
        };

        let position = positions.resolve(&track, |album_id| playlist::get_album(&client, album_id));
        track.position = Some(position);

        let output = output_path(&opts.directory, &opts.name_template, &track);
        if let Some(folder) = output.parent() {
            if let Err(e) = fs::create_dir_all(folder) {
                warning!("Cannot create folder {}. Err: {}", folder.display(), e);
                continue;
            }
        }

        println!();
        info!("[{}/{}] {}", index + 1, total, output.display());

        let downloaded = download_track(
            downloader.as_ref(),
            &url,
            &output,
            client.request(),
            opts.force,
            || utils::query_yes_no("File already exists. Skip downloading?", true),
        );

        if downloaded {
            downloaded_count += 1;
            if !opts.no_tag {
                if let Err(e) = tags::add_id3_tag(&client, &output, &track, opts.lrc_timetag) {
                    warning!("Failed to tag {}. Err: {}", output.display(), e);
                }
            }
        }

        if !opts.no_wait {
            wait(WAIT_BETWEEN_TRACKS);
        }
    }

    success!("Downloaded {} of {} track(s)", downloaded_count, total);
}

/// `<sanitized rendered template>.mp3`
pub fn format_filename(template: &NameTemplate, track: &Track) -> String {
    format!("{}.mp3", utils::sanitize_filename(&template.render(track)))
}

/// `<directory>/<sanitized album name>`
pub fn format_folder(directory: &Path, track: &Track) -> PathBuf {
    directory.join(utils::sanitize_filename(&track.album_name))
}

pub fn format_output(folder: &Path, filename: &str) -> PathBuf {
    folder.join(utils::sanitize_filename(filename))
}

/// Where a track ends up on disk.
pub fn output_path(directory: &Path, template: &NameTemplate, track: &Track) -> PathBuf {
    let filename = format_filename(template, track);
    let folder = format_folder(directory, track);
    format_output(&folder, &filename)
}

fn login(client: &mut XiamiClient, username: &str, password: &str) -> bool {
    info!("Login for VIP...");
    match auth::vip_login(client, username, password) {
        Ok(cookie) => {
            client.set_cookie(cookie);
            success!("Login success");
            true
        }
        Err(e) => {
            warning!("VIP login failed, continuing without VIP. Err: {}", e);
            false
        }
    }
}

/// Fills in `track.url`, preferring the VIP location when `vip` is set.
///
/// A failed VIP lookup keeps the regular location. Returns `false` when the
/// location cannot be decoded; the track is then left without a URL.
pub fn resolve_download_url(client: &XiamiClient, track: &mut Track, vip: bool) -> bool {
    if vip {
        match auth::vip_location(client, &track.song_id) {
            Ok(location) => track.location = location,
            Err(e) => warning!(
                "Cannot get VIP location for {}, using the regular one. Err: {}",
                track.title,
                e
            ),
        }
    }

    match decode_location(&track.location) {
        Ok(url) => {
            track.url = Some(url);
            info!("Got download url for {}", track.title);
            true
        }
        Err(e) => {
            warning!("Cannot decode location of {}. Err: {}", track.title, e);
            false
        }
    }
}

/// Downloads one track to `output` and reports whether a new file was written.
///
/// When `output` already exists and `force` is off, `skip_existing` decides
/// whether to keep the file (`true`) or download over it.
///
/// # Arguments
///
/// * `downloader` - backend chosen with `--tool`
/// * `url` - decoded download URL
/// * `output` - destination file
/// * `request` - headers for the audio request
/// * `force` - overwrite without asking
/// * `skip_existing` - asked only for existing files
pub fn download_track<F>(
    downloader: &dyn Downloader,
    url: &str,
    output: &Path,
    request: &RequestConfig,
    force: bool,
    skip_existing: F,
) -> bool
where
    F: FnOnce() -> bool,
{
    if !force && output.exists() && skip_existing() {
        info!("Skipped {}", output.display());
        return false;
    }

    match downloader.download(url, output, request) {
        Ok(()) => {
            success!("Downloaded {}", output.display());
            true
        }
        Err(e) => {
            warning!("Error downloading: {}", e);
            false
        }
    }
}

fn wait(duration: Duration) {
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!(
        "Waiting {}s to avoid throttling...",
        duration.as_secs()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    thread::sleep(duration);
    pb.finish_and_clear();
}
