//! # CLI Module
//!
//! User-facing command implementations. The downloader has a single command:
//! resolve the requested songs, albums and playlists, then download and tag
//! every track one after another.
//!
//! ## Data Flow
//!
//! ```text
//! IDs → playlist URLs → track lists → decoded URLs → files on disk → ID3 tags
//! ```
//!
//! 1. **Argument resolution**: song/album/playlist IDs become API URLs
//! 2. **VIP login** (optional): the session cookie joins the request config
//! 3. **Playlist fetch**: every URL is fetched and parsed into tracks
//! 4. **Location decode**: VIP locations are requested first when logged in
//! 5. **Download**: through the downloader chosen with `--tool`
//! 6. **Tag**: title, album, artist, track number, lyrics and cover
//!
//! A fixed 10 second pause separates tracks unless `--no-wait` is given.
//!
//! ## Error Handling
//!
//! Per-track problems are reported with `warning!` and the run continues
//! with the next track. Only setup failures (HTTP client construction) end
//! the program through `error!`.

mod download;

pub use download::DownloadOptions;
pub use download::WAIT_BETWEEN_TRACKS;
pub use download::download;
pub use download::download_track;
pub use download::format_filename;
pub use download::format_folder;
pub use download::format_output;
pub use download::output_path;
pub use download::resolve_download_url;
