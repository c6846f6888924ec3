//! Collaborators on the user facing side of the browser: notifications,
//! navigation and the desktop integrations used by download and share.

use std::path::PathBuf;

use async_trait::async_trait;
use kernel::Route;

use crate::error::Result;

/// Transient success and error messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

#[async_trait]
pub trait Desktop: Send + Sync {
    /// Opens an external URL, e.g. a messaging app share intent.
    fn open_url(&self, url: &str) -> Result<()>;

    fn copy_text(&self, text: &str) -> Result<()>;

    /// Materializes downloaded bytes as a file named `file_name` and returns where it landed.
    async fn save_file(&self, file_name: &str, data: &[u8]) -> Result<PathBuf>;
}

/// Everything the browser needs from its user facing side.
pub trait Surface: Notifier + Navigator + Desktop {}

impl<T: Notifier + Navigator + Desktop> Surface for T {}

/// Strips directory components from a record filename so a save never
/// escapes the target directory.
#[must_use]
pub fn name_from_path(path: &str) -> &str {
    if let Some(ix) = path.rfind(&['\\', '/']) {
        &path[ix + 1..]
    } else {
        path
    }
}
