use std::{path::Path, process::Command};

use crate::{Res, download::Downloader, xiami::RequestConfig};

/// Delegates the transfer to `wget`, which must be on `PATH`.
pub struct WgetDownloader {
    program: String,
}

impl Default for WgetDownloader {
    fn default() -> Self {
        Self {
            program: "wget".to_string(),
        }
    }
}

impl WgetDownloader {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The `wget` invocation for one download, without running it.
    pub fn command(&self, url: &str, destination: &Path, request: &RequestConfig) -> Command {
        let mut command = Command::new(&self.program);
        for (name, value) in request.pairs() {
            command.arg(format!("--header={name}: {value}"));
        }
        command.arg("-O").arg(destination).arg(url);
        command
    }
}

impl Downloader for WgetDownloader {
    fn download(&self, url: &str, destination: &Path, request: &RequestConfig) -> Res<()> {
        let status = self.command(url, destination, request).status()?;
        if !status.success() {
            return Err(format!("{} exited with {}", self.program, status).into());
        }
        Ok(())
    }
}
