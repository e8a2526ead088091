//! Core download functionality for https-dwnld
//!
//! Runs one authenticated download: fetch, check status, then either save the
//! body in fixed-size chunks or read it whole for display.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::core::error::{Error, Result};
use crate::core::fetcher::{FetchResponse, HttpFetcher};
use crate::core::report::Outcome;
use crate::core::request::{DownloadRequest, Target};
use crate::core::stream::{chunk_count, read_chunk, DownloadOptions};

/// HTTP status accepted as success
const STATUS_OK: u16 = 200;

/// Remove a file left by a previous run; a missing file is fine
async fn remove_stale_file(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("removed existing file: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::IoError(e)),
    }
}

/// Downloader bound to one fetcher implementation
pub struct Downloader<F: HttpFetcher> {
    fetcher: F,
    options: DownloadOptions,
}

impl<F: HttpFetcher> Downloader<F> {
    /// Create a downloader with default options
    pub fn new(fetcher: F) -> Self {
        Self::with_options(fetcher, DownloadOptions::default())
    }

    /// Create a downloader with custom options
    pub fn with_options(fetcher: F, options: DownloadOptions) -> Self {
        Self { fetcher, options }
    }

    /// Validate raw arguments into a request, then download
    ///
    /// Argument errors are returned before the fetcher is used.
    pub async fn download_from_args(
        &self,
        user: &str,
        password: &str,
        url: &str,
        out_dir: Option<PathBuf>,
        show: bool,
    ) -> Result<Outcome> {
        let request = DownloadRequest::new(user, password, url, out_dir, show)?;
        self.download(&request).await
    }

    /// Run a download request to completion
    pub async fn download(&self, request: &DownloadRequest) -> Result<Outcome> {
        if matches!(request.target, Target::SaveTo(_)) && self.options.chunk_size == 0 {
            return Err(Error::InvalidInput("chunk size must be positive".to_string()));
        }
        let save_path = request.save_path()?;

        let response = self
            .fetcher
            .get(&request.url, &request.user, &request.password)
            .await?;

        if response.status != STATUS_OK {
            return Err(Error::Status(response.status));
        }

        match save_path {
            Some(path) => {
                self.save_to_file(response, &path).await?;
                Ok(Outcome::Saved(path))
            }
            None => self.read_for_display(response).await.map(Outcome::Shown),
        }
    }

    /// Stream the body to `save_path` chunk by chunk
    async fn save_to_file(&self, response: FetchResponse, save_path: &Path) -> Result<()> {
        let total_size = response.content_length.ok_or(Error::MissingContentLength)?;
        let chunk_size = self.options.chunk_size;
        let chunks_total = chunk_count(total_size, chunk_size);

        debug!("downloading to: {}", save_path.display());
        debug!("file size: {total_size}");
        debug!("chunk size: {chunk_size}");
        debug!("chunk count: {chunks_total}");

        remove_stale_file(save_path).await?;
        let mut file = tokio::fs::File::create(save_path).await?;

        let mut stream = response.stream.take(total_size);
        let mut buffer = vec![0u8; chunk_size];
        let mut downloaded = 0u64;
        let mut chunks_written = 0u64;

        loop {
            let bytes_read = read_chunk(&mut stream, &mut buffer)
                .await
                .map_err(|e| Error::NetworkError(format!("Stream read error: {e}")))?;

            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read]).await?;
            downloaded += bytes_read as u64;
            chunks_written += 1;

            if let Some(ref progress) = self.options.progress {
                progress(chunks_written, chunks_total);
            }
        }

        file.flush().await?;

        if downloaded != total_size {
            return Err(Error::Truncated {
                expected: total_size,
                received: downloaded,
            });
        }

        debug!(
            "downloaded size: {}",
            tokio::fs::metadata(save_path).await?.len()
        );
        Ok(())
    }

    /// Read the whole body into memory
    async fn read_for_display(&self, mut response: FetchResponse) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        response
            .stream
            .read_to_end(&mut body)
            .await
            .map_err(|e| Error::NetworkError(format!("Stream read error: {e}")))?;
        debug!("read {} bytes for display", body.len());
        Ok(body)
    }
}
