use std::{
    cell::{Cell, RefCell},
    fs,
    io::{Read, Write},
    net::TcpListener,
    path::{Path, PathBuf},
    thread,
};

use xiamidl::{
    Res,
    cli::{
        download_track, format_filename, format_folder, format_output, output_path,
        resolve_download_url,
    },
    download::{self, Downloader, HttpDownloader, Tool, WgetDownloader},
    management::TrackPositionManager,
    types::{Track, TrackPosition},
    utils::parse_name_template,
    xiami::{RequestConfig, XiamiClient, playlist},
};

// Nothing listens on port 1, so every request fails to connect
const UNREACHABLE: &str = "http://127.0.0.1:1";

// Downloader that records every call instead of touching the network
struct RecordingDownloader {
    fail: bool,
    calls: RefCell<Vec<PathBuf>>,
}

impl RecordingDownloader {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Downloader for RecordingDownloader {
    fn download(&self, _url: &str, destination: &Path, _request: &RequestConfig) -> Res<()> {
        self.calls.borrow_mut().push(destination.to_path_buf());
        if self.fail {
            Err("connection reset".into())
        } else {
            Ok(())
        }
    }
}

// Helper function to serve one raw HTTP response on a local port
fn serve_once(response: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(&response);
        }
    });

    format!("http://{addr}")
}

fn http_response(content_length: usize, body: &[u8], content_type: &str) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {content_length}\r\n\
         Connection: close\r\n\r\n"
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

fn create_test_request() -> RequestConfig {
    RequestConfig::new("UA/1.0", "http://www.xiami.com/song/play")
}

// Helper function to create a test track
fn create_test_track(song_id: &str, album_id: &str, title: &str) -> Track {
    Track {
        title: title.to_string(),
        artist: "Artist".to_string(),
        album_name: "Album".to_string(),
        song_id: song_id.to_string(),
        album_id: album_id.to_string(),
        ..Default::default()
    }
}

fn create_album(album_id: &str, song_ids: &[&str]) -> Vec<Track> {
    song_ids
        .iter()
        .map(|id| create_test_track(id, album_id, id))
        .collect()
}

#[test]
fn test_wget_command() {
    let request = RequestConfig::new("UA/1.0", "http://www.xiami.com/song/play")
        .with_cookie("member_auth=abc; t_sign_auth=1");
    let command = WgetDownloader::default().command(
        "http://m5.file.xiami.com/a.mp3",
        Path::new("out/a.mp3"),
        &request,
    );

    assert_eq!(command.get_program(), "wget");
    let args: Vec<String> = command
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        vec![
            "--header=User-Agent: UA/1.0",
            "--header=Referer: http://www.xiami.com/song/play",
            "--header=Cookie: member_auth=abc; t_sign_auth=1",
            "-O",
            "out/a.mp3",
            "http://m5.file.xiami.com/a.mp3",
        ]
    );
}

#[test]
fn test_wget_missing_program_fails() {
    let request = RequestConfig::new("UA/1.0", "http://www.xiami.com/song/play");
    let dir = tempfile::tempdir().unwrap();
    let downloader = WgetDownloader::with_program("xiamidl-no-such-downloader");

    let result = downloader.download(
        "http://m5.file.xiami.com/a.mp3",
        &dir.path().join("a.mp3"),
        &request,
    );
    assert!(result.is_err());
}

#[test]
fn test_tool_selection() {
    assert_eq!(Tool::default(), Tool::Http);
    assert_eq!(Tool::Http.to_string(), "http");
    assert_eq!(Tool::Wget.to_string(), "wget");

    assert!(download::for_tool(Tool::Http).is_ok());
    assert!(download::for_tool(Tool::Wget).is_ok());
}

#[test]
fn test_position_manager_add_album() {
    let mut positions = TrackPositionManager::new();
    positions.add_album(&create_album("10", &["a", "b", "c"]));

    assert_eq!(positions.count(), 3);
    assert!(positions.has("b"));
    assert_eq!(positions.get("b"), Some(TrackPosition { track: 2, count: 3 }));
    assert_eq!(positions.get("z"), None);
}

#[test]
fn test_position_manager_fetches_each_album_once() {
    let mut positions = TrackPositionManager::new();
    let fetches = Cell::new(0);
    let fetch = |album_id: &str| {
        fetches.set(fetches.get() + 1);
        assert_eq!(album_id, "10");
        create_album("10", &["a", "b", "c", "d"])
    };

    let first = positions.resolve(&create_test_track("c", "10", "c"), fetch);
    assert_eq!(first, TrackPosition { track: 3, count: 4 });

    let second = positions.resolve(&create_test_track("a", "10", "a"), fetch);
    assert_eq!(second, TrackPosition { track: 1, count: 4 });

    assert_eq!(fetches.get(), 1);
}

#[test]
fn test_position_manager_unknown_song() {
    let mut positions = TrackPositionManager::new();

    // Album lookup failed (empty list)
    let position = positions.resolve(&create_test_track("a", "10", "a"), |_| Vec::new());
    assert_eq!(position, TrackPosition::default());
    assert_eq!(position.number(), "0/0");
}

#[test]
fn test_output_path() {
    let template = parse_name_template("{id} - {title} - {artist}").unwrap();
    let mut track = create_test_track("1", "10", "What?");
    track.album_name = "AC/DC: Live".to_string();
    track.position = Some(TrackPosition { track: 1, count: 10 });

    assert_eq!(format_filename(&template, &track), "01 - What_ - Artist.mp3");
    assert_eq!(
        format_folder(Path::new("downloads"), &track),
        Path::new("downloads").join("AC_DC_ Live")
    );
    assert_eq!(
        output_path(Path::new("downloads"), &template, &track),
        Path::new("downloads")
            .join("AC_DC_ Live")
            .join("01 - What_ - Artist.mp3")
    );
}

#[test]
fn test_format_output_sanitizes_again() {
    let output = format_output(Path::new("music"), "a/b.mp3");
    assert_eq!(output, Path::new("music").join("a_b.mp3"));
}

#[test]
fn test_http_download_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("a.mp3");
    let base = serve_once(http_response(1000, &[7u8; 1000], "audio/mpeg"));

    let downloader = HttpDownloader::new().unwrap();
    let result = downloader.download(
        &format!("{base}/a.mp3"),
        &destination,
        &create_test_request(),
    );

    assert!(result.is_ok());
    assert_eq!(fs::metadata(&destination).unwrap().len(), 1000);
}

#[test]
fn test_http_download_removes_truncated_file() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("a.mp3");

    // Connection closes after 1000 of the announced 100000 bytes
    let base = serve_once(http_response(100_000, &[7u8; 1000], "audio/mpeg"));

    let downloader = HttpDownloader::new().unwrap();
    let result = downloader.download(
        &format!("{base}/a.mp3"),
        &destination,
        &create_test_request(),
    );

    assert!(result.is_err());
    assert!(!destination.exists());
}

#[test]
fn test_http_download_unreachable_host() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("a.mp3");

    let downloader = HttpDownloader::new().unwrap();
    let result = downloader.download(
        &format!("{UNREACHABLE}/a.mp3"),
        &destination,
        &create_test_request(),
    );

    assert!(result.is_err());
    assert!(!destination.exists());
}

#[test]
fn test_download_track_new_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    let downloader = RecordingDownloader::new(false);

    // No prompt for files that do not exist yet
    let downloaded = download_track(
        &downloader,
        "http://x/a.mp3",
        &output,
        &create_test_request(),
        false,
        || panic!("prompted for a missing file"),
    );

    assert!(downloaded);
    assert_eq!(*downloader.calls.borrow(), vec![output]);
}

#[test]
fn test_download_track_skips_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    fs::write(&output, b"old").unwrap();
    let downloader = RecordingDownloader::new(false);

    let downloaded = download_track(
        &downloader,
        "http://x/a.mp3",
        &output,
        &create_test_request(),
        false,
        || true,
    );

    assert!(!downloaded);
    assert!(downloader.calls.borrow().is_empty());
    assert_eq!(fs::read(&output).unwrap(), b"old");
}

#[test]
fn test_download_track_replaces_existing_file_when_declined() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    fs::write(&output, b"old").unwrap();
    let downloader = RecordingDownloader::new(false);

    let downloaded = download_track(
        &downloader,
        "http://x/a.mp3",
        &output,
        &create_test_request(),
        false,
        || false,
    );

    assert!(downloaded);
    assert_eq!(downloader.calls.borrow().len(), 1);
}

#[test]
fn test_download_track_force_never_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    fs::write(&output, b"old").unwrap();
    let downloader = RecordingDownloader::new(false);

    let downloaded = download_track(
        &downloader,
        "http://x/a.mp3",
        &output,
        &create_test_request(),
        true,
        || panic!("prompted despite --force"),
    );

    assert!(downloaded);
    assert_eq!(downloader.calls.borrow().len(), 1);
}

#[test]
fn test_download_track_failure_is_not_counted() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("a.mp3");
    let downloader = RecordingDownloader::new(true);

    let downloaded = download_track(
        &downloader,
        "http://x/a.mp3",
        &output,
        &create_test_request(),
        false,
        || true,
    );

    assert!(!downloaded);
    assert_eq!(downloader.calls.borrow().len(), 1);
}

#[test]
fn test_resolve_download_url() {
    let client = XiamiClient::new(UNREACHABLE, create_test_request()).unwrap();
    let mut track = create_test_track("1", "10", "Song");
    track.location = "3adgbecf".to_string();

    assert!(resolve_download_url(&client, &mut track, false));
    assert_eq!(track.url.as_deref(), Some("abcdefg"));
}

#[test]
fn test_resolve_download_url_undecodable_location() {
    let client = XiamiClient::new(UNREACHABLE, create_test_request()).unwrap();
    let mut track = create_test_track("1", "10", "Song");
    track.location = "xabc".to_string();

    // Track is left without a URL and gets skipped
    assert!(!resolve_download_url(&client, &mut track, false));
    assert_eq!(track.url, None);
}

#[test]
fn test_resolve_download_url_prefers_vip_location() {
    let body = br#"{"location":"1xyz"}"#;
    let base = serve_once(http_response(body.len(), body, "application/json"));
    let client = XiamiClient::new(base, create_test_request()).unwrap();
    let mut track = create_test_track("1", "10", "Song");
    track.location = "3adgbecf".to_string();

    assert!(resolve_download_url(&client, &mut track, true));
    assert_eq!(track.location, "1xyz");
    assert_eq!(track.url.as_deref(), Some("xyz"));
}

#[test]
fn test_resolve_download_url_empty_vip_location_keeps_regular() {
    // No high-quality copy: the endpoint answers with an empty location
    let body = br#"{"location":""}"#;
    let base = serve_once(http_response(body.len(), body, "application/json"));
    let client = XiamiClient::new(base, create_test_request()).unwrap();
    let mut track = create_test_track("1", "10", "Song");
    track.location = "3adgbecf".to_string();

    assert!(resolve_download_url(&client, &mut track, true));
    assert_eq!(track.location, "3adgbecf");
    assert_eq!(track.url.as_deref(), Some("abcdefg"));
}

#[test]
fn test_resolve_download_url_vip_network_error_keeps_regular() {
    let client = XiamiClient::new(UNREACHABLE, create_test_request()).unwrap();
    let mut track = create_test_track("1", "10", "Song");
    track.location = "3adgbecf".to_string();

    assert!(resolve_download_url(&client, &mut track, true));
    assert_eq!(track.url.as_deref(), Some("abcdefg"));
}

#[test]
fn test_network_errors_give_empty_results() {
    let client = XiamiClient::new(UNREACHABLE, create_test_request()).unwrap();

    assert_eq!(client.get_text(&format!("{UNREACHABLE}/lyric.lrc")), "");
    assert!(client.get_bytes(&format!("{UNREACHABLE}/cover.jpg")).is_empty());
    assert!(client.get(&format!("{UNREACHABLE}/song")).is_err());

    // Track lists fall back to empty instead of failing the run
    let url = format!("{UNREACHABLE}/song/playlist/id/1/type/1/cat/json");
    assert!(playlist::get_playlist(&client, &url).is_empty());
    assert!(playlist::get_album(&client, "10").is_empty());
}
