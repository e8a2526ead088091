//! Core library modules for https-dwnld
//!
//! This module contains the internal implementation details of the https-dwnld library.

pub mod error;
pub mod request;
pub mod fetcher;
pub mod stream;
pub mod progress;
pub mod report;
pub mod downloader;

