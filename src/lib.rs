//! Xiami Downloader CLI Library
//!
//! This library resolves Xiami song, album and playlist IDs into track lists,
//! decodes the obfuscated track locations into download URLs, downloads the
//! audio and writes ID3 tags. Everything runs sequentially on blocking I/O.
//!
//! # Modules
//!
//! - `cli` - Command implementations (the download orchestrator)
//! - `config` - Configuration management and environment variables
//! - `download` - Downloader capability and its implementations
//! - `management` - In-process caches (track positions)
//! - `tags` - ID3 tag writing
//! - `types` - Data structures and type definitions
//! - `utils` - File naming, lyric conversion and prompt helpers
//! - `xiami` - Xiami API client, playlist parsing and location decoding

pub mod cli;
pub mod config;
pub mod download;
pub mod management;
pub mod tags;
pub mod types;
pub mod utils;
pub mod xiami;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object so that HTTP, I/O, tag and
/// decoding errors can all be propagated with `?`.
///
/// # Example
///
/// ```
/// use xiamidl::Res;
///
/// fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
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
///
/// # Example
///
/// ```
/// success!("Downloaded {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors where recovery is not possible. Per-track failures
/// use [`warning!`] instead so the remaining tracks still get processed.
///
/// # Example
///
/// ```
/// error!("Invalid download directory: {}", dir);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems: network errors, undecodable locations,
/// failed downloads or tag writes.
///
/// # Example
///
/// ```
/// warning!("Failed to fetch lyrics: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
