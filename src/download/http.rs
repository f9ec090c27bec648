use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;

use crate::{Res, download::Downloader, xiami::RequestConfig};

/// Streams the response body straight into the destination file.
///
/// The destination is removed again when the transfer fails part way.
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new() -> Res<Self> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, destination: &Path, request: &RequestConfig) -> Res<()> {
        let mut response = self
            .client
            .get(url)
            .headers(request.header_map()?)
            .send()?
            .error_for_status()?;

        let pb = match response.content_length() {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.blue} [{bar:40.blue}] {bytes}/{total_bytes} ({eta})",
                    )?
                    .progress_chars("=> ")
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner:.blue} {bytes} downloaded")?
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
                );
                pb
            }
        };

        let file = File::create(destination)?;
        let mut writer = pb.wrap_write(BufWriter::new(file));
        let result: Res<()> = response
            .copy_to(&mut writer)
            .map_err(Into::into)
            .and_then(|_| writer.flush().map_err(Into::into));
        pb.finish_and_clear();
        drop(writer);

        if result.is_err() {
            // never leave a truncated file at the destination
            let _ = fs::remove_file(destination);
        }
        result
    }
}
