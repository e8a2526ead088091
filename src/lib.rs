//! # https-dwnld
//!
//! Download a single file from an HTTP(S) URL protected by Basic
//! Authentication, either saving it into a directory or returning its
//! content for display.
//!
//! ```no_run
//! use https_dwnld::{Downloader, DownloadRequest, FetcherConfig, ReqwestFetcher};
//!
//! # async fn run() -> https_dwnld::Result<()> {
//! let fetcher = ReqwestFetcher::new(&FetcherConfig::default())?;
//! let request = DownloadRequest::new(
//!     "user",
//!     "secret",
//!     "https://example.com/files/report.csv",
//!     Some("downloads".into()),
//!     false,
//! )?;
//! let outcome = Downloader::new(fetcher).download(&request).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod core;

pub use crate::core::downloader::Downloader;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::fetcher::{FetchResponse, FetcherConfig, HttpFetcher, ReqwestFetcher};
pub use crate::core::progress::{format_progress, render_bar, BarStyle, ConsoleProgress};
pub use crate::core::report::{decode_content, write_content, Content, Outcome, ResultToken};
pub use crate::core::request::{file_name_from_url, resolve_save_path, DownloadRequest, Target};
pub use crate::core::stream::{
    chunk_count, read_chunk, DownloadOptions, DownloadStream, ProgressCallback,
    DEFAULT_CHUNK_SIZE,
};
