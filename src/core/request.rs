//! Download request construction for https-dwnld
//!
//! Validates user input into a typed request before any network I/O.

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::core::error::{Error, Result};

/// Where downloaded content goes
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Save under the given output directory
    SaveTo(PathBuf),
    /// Print content to the console
    Show,
}

impl Target {
    /// Build a target from the raw action flags
    ///
    /// Exactly one of `out_dir` and `show` must be given.
    pub fn from_flags(out_dir: Option<PathBuf>, show: bool) -> Result<Self> {
        match (out_dir, show) {
            (Some(dir), false) => Ok(Target::SaveTo(dir)),
            (None, true) => Ok(Target::Show),
            (Some(_), true) => Err(Error::InvalidInput(
                "arguments `out` and `show` are exclusive".to_string(),
            )),
            (None, false) => Err(Error::InvalidInput(
                "one of `out` or `show` is required".to_string(),
            )),
        }
    }
}

/// A single authenticated download
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub user: String,
    pub password: String,
    pub url: Url,
    pub target: Target,
}

impl DownloadRequest {
    /// Create a request, checking the URL and the target flags
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        url: &str,
        out_dir: Option<PathBuf>,
        show: bool,
    ) -> Result<Self> {
        let target = Target::from_flags(out_dir, show)?;
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidInput(format!("invalid URL '{url}': {e}")))?;

        Ok(Self {
            user: user.into(),
            password: password.into(),
            url,
            target,
        })
    }

    /// Destination file for save mode, `None` in show mode
    pub fn save_path(&self) -> Result<Option<PathBuf>> {
        match &self.target {
            Target::SaveTo(dir) => resolve_save_path(dir, &self.url).map(Some),
            Target::Show => Ok(None),
        }
    }
}

/// Last segment of the URL path, used as the saved file name
pub fn file_name_from_url(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
}

/// Joins the output directory with the file name taken from the URL
pub fn resolve_save_path(out_dir: &Path, url: &Url) -> Result<PathBuf> {
    let file_name = file_name_from_url(url)
        .ok_or_else(|| Error::InvalidInput(format!("URL has no file name: {url}")))?;

    let dir = if out_dir.is_absolute() {
        out_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(out_dir)
    };

    Ok(dir.join(file_name))
}
