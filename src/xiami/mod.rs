//! # Xiami Integration Module
//!
//! Client for the (undocumented) Xiami web API used by the downloader.
//!
//! ## Layout
//!
//! ```text
//! CLI (download orchestrator)
//!          ↓
//! Xiami Integration Layer
//!     ├── client    request configuration + blocking HTTP client
//!     ├── auth      VIP login and high-quality locations
//!     ├── playlist  playlist/album/song track lists
//!     └── location  location string deobfuscation
//!          ↓
//! HTTP Layer (reqwest::blocking, JSON)
//! ```
//!
//! ## Endpoints
//!
//! - `GET /song/playlist/id/{id}/object_name/default/object_id/0/cat/json` - single song
//! - `GET /song/playlist/id/{id}/type/1/cat/json` - album track list
//! - `GET /song/playlist/id/{id}/type/3/cat/json` - playlist (collect) track list
//! - `GET /song/gethqsong/sid/{song_id}` - high-quality location (VIP cookie required)
//! - `POST /web/login` - VIP login, answers with a `member_auth` cookie
//!
//! ## Error Handling
//!
//! Track list requests are fail-open: network errors are printed and turn
//! into empty track lists. VIP requests return `Res` so the caller can fall
//! back to the regular location.

use std::fmt::Display;

pub mod auth;
pub mod client;
pub mod location;
pub mod playlist;

pub use client::{RequestConfig, XiamiClient};

/// The kind of ID passed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Song,
    Album,
    Playlist,
}

impl ListKind {
    /// Playlist API URL returning the tracks behind `id`.
    pub fn url(&self, base_url: &str, id: impl Display) -> String {
        let prefix = format!("{base_url}/song/playlist/id/{id}");
        match self {
            ListKind::Song => format!("{prefix}/object_name/default/object_id/0/cat/json"),
            ListKind::Album => format!("{prefix}/type/1/cat/json"),
            ListKind::Playlist => format!("{prefix}/type/3/cat/json"),
        }
    }
}

/// Builds one playlist URL per ID, keeping the command-line order.
pub fn build_url_list(kind: ListKind, base_url: &str, ids: &[u64]) -> Vec<String> {
    ids.iter().map(|id| kind.url(base_url, id)).collect()
}

pub fn vip_location_url(base_url: &str, song_id: &str) -> String {
    format!("{base_url}/song/gethqsong/sid/{song_id}")
}

pub fn login_url(base_url: &str) -> String {
    format!("{base_url}/web/login")
}
