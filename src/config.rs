//! Configuration management for the Xiami downloader.
//!
//! Configuration values come from environment variables, optionally seeded by
//! a `.env` file in the local data directory. Command-line flags take
//! precedence over everything loaded here:
//! 1. Command-line flags (highest priority)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, path::PathBuf};

/// Base URL of the Xiami web API.
pub const DEFAULT_API_URL: &str = "http://www.xiami.com";

/// Without a browser-like user agent the API answers 403/503.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; MSIE 9.0; Windows NT 7.1; Trident/5.0)";

/// Default file name template for downloaded tracks.
pub const DEFAULT_NAME_TEMPLATE: &str = "{id} - {title} - {artist}";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/xiamidl/.env`
/// - macOS: `~/Library/Application Support/xiamidl/.env`
/// - Windows: `%LOCALAPPDATA%/xiamidl/.env`
///
/// A missing file is fine: every value has a default or a CLI flag.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or the
/// `.env` file exists but cannot be parsed.
pub fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

/// Location of the `.env` file read by [`load_env`].
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("xiamidl/.env");
    path
}

/// Returns the Xiami API base URL without a trailing slash.
///
/// Read from `XIAMI_API_URL`, defaulting to [`DEFAULT_API_URL`].
pub fn api_url() -> String {
    non_empty_var("XIAMI_API_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the `User-Agent` sent with every request.
pub fn user_agent() -> String {
    non_empty_var("XIAMI_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
}

/// VIP account email from `XIAMI_USERNAME`, if set.
pub fn vip_username() -> Option<String> {
    non_empty_var("XIAMI_USERNAME")
}

/// VIP account password from `XIAMI_PASSWORD`, if set.
pub fn vip_password() -> Option<String> {
    non_empty_var("XIAMI_PASSWORD")
}

/// Download root from `XIAMI_DIRECTORY`, falling back to the working directory.
pub fn download_directory() -> PathBuf {
    non_empty_var("XIAMI_DIRECTORY")
        .map(PathBuf::from)
        .unwrap_or_default()
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
