//! # Download Module
//!
//! The orchestrator writes audio files through the [`Downloader`] capability.
//! Which implementation backs it is decided once at startup from the
//! `--tool` flag:
//!
//! - [`HttpDownloader`] - built-in blocking HTTP fetch with a progress bar
//! - [`WgetDownloader`] - hands the transfer to an external `wget`
//!
//! Both receive the same [`RequestConfig`] the API client uses, so a VIP
//! session cookie also applies to the audio request.

use std::{fmt, path::Path};

use clap::ValueEnum;

use crate::{Res, xiami::RequestConfig};

mod http;
mod wget;

pub use http::HttpDownloader;
pub use wget::WgetDownloader;

/// Fetches `url` into `destination`.
pub trait Downloader {
    fn download(&self, url: &str, destination: &Path, request: &RequestConfig) -> Res<()>;
}

/// Downloader selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Tool {
    /// Built-in HTTP client
    #[default]
    Http,
    /// External wget binary
    Wget,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::Http => write!(f, "http"),
            Tool::Wget => write!(f, "wget"),
        }
    }
}

/// Instantiates the downloader for a tool.
pub fn for_tool(tool: Tool) -> Res<Box<dyn Downloader>> {
    Ok(match tool {
        Tool::Http => Box::new(HttpDownloader::new()?),
        Tool::Wget => Box::new(WgetDownloader::default()),
    })
}
