#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]

pub mod backend;
pub mod browser;
pub mod config;
pub mod error;
pub mod memory;
pub mod query;
pub mod render;
pub mod resolve;
pub mod resource;
pub mod selection;
pub mod share;
pub mod stats;
pub mod supabase;
pub mod surface;

pub use browser::{DownloadError, DownloadState, FileBrowser};
pub use config::Config;
pub use error::{Error, Result};
pub use supabase::SupabaseBackend;
