//! ytmp3-core: YouTube audio download, MP3 conversion, and playlist batching

pub mod batch;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod naming;
pub mod playlist;
pub mod url;

pub use config::Config;
pub use error::{Result, YtMp3Error};
