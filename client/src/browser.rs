//! The "My Files" view: session guard, list and thumbnail loading,
//! search/sort, selection, bulk delete, download and share.
//!
//! Every action takes `&mut self` and suspends only at backend calls, so the
//! view state has a single owner and needs no locking. Backend failures never
//! escape an action: they end up as notifications on the surface and the view
//! stays in its last stable state.

use std::collections::HashMap;
use std::path::PathBuf;

use kernel::{DeleteResult, FileRecord, Route, Session, SharePlatform, SortKey};
use thiserror::Error;

use crate::backend::Backend;
use crate::config::{Config, DEFAULT_SIGNED_URL_TTL};
use crate::error::Error;
use crate::query::{self, SortState};
use crate::resolve::{ObjectIndex, user_prefix};
use crate::selection::Selection;
use crate::share::{ShareAction, share_action};
use crate::stats::Stats;
use crate::surface::{Surface, name_from_path};

pub const LOAD_FAILED: &str = "Failed to load files";
pub const DELETE_FAILED: &str = "Failed to delete file";
pub const BULK_DELETE_FAILED: &str = "Failed to delete files";
pub const DOWNLOAD_FAILED: &str = "Failed to download file";
pub const DOWNLOADED: &str = "File downloaded securely!";
pub const LINK_COPIED: &str = "Link copied to clipboard!";
pub const NO_MATCHES: &str = "No files match your search";
pub const NO_FILES: &str = "No files uploaded yet";

/// Reasons a download is aborted. The display text is what the user sees.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DownloadError {
    #[error("Please login to download files")]
    NoSession,
    #[error("File not found in storage")]
    NotInStorage,
    #[error("Unauthorized access")]
    Unauthorized,
    #[error("{0}")]
    Failed(String),
}

/// Download dialog: `Idle -> Confirming -> Downloading -> Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DownloadState {
    #[default]
    Idle,
    Confirming(FileRecord),
    Downloading(FileRecord),
}

pub struct FileBrowser<B, S> {
    backend: B,
    surface: S,
    origin: String,
    signed_url_ttl: u64,
    files: Vec<FileRecord>,
    thumbnails: HashMap<String, String>,
    loading: bool,
    search: String,
    sort: SortState,
    selection: Selection,
    download: DownloadState,
    bulk_delete_open: bool,
}

impl<B: Backend, S: Surface> FileBrowser<B, S> {
    /// A fresh view shows the loading indicator until the first load finishes.
    pub fn new(backend: B, surface: S, origin: &str) -> Self {
        Self {
            backend,
            surface,
            origin: origin.trim_end_matches('/').to_owned(),
            signed_url_ttl: DEFAULT_SIGNED_URL_TTL,
            files: Vec::new(),
            thumbnails: HashMap::new(),
            loading: true,
            search: String::new(),
            sort: SortState::default(),
            selection: Selection::new(),
            download: DownloadState::Idle,
            bulk_delete_open: false,
        }
    }

    pub fn from_config(backend: B, surface: S, config: &Config) -> Self {
        let mut browser = Self::new(backend, surface, &config.origin);
        browser.signed_url_ttl = config.signed_url_ttl;
        browser
    }

    /// Session guard. Without a session the view redirects to the login page
    /// and does nothing else. Returns whether the files were loaded.
    pub async fn mount(&mut self) -> bool {
        if self.session().await.is_none() {
            tracing::info!("no active session, redirecting to login");
            self.surface.redirect(Route::Login);
            return false;
        }
        self.load_files().await;
        true
    }

    /// Replaces the list with the user's records, newest first, then rebuilds
    /// the thumbnails. On failure the previous list is kept.
    pub async fn load_files(&mut self) {
        self.loading = true;
        match self.backend.list_files().await {
            Ok(files) => {
                tracing::info!("loaded {} file(s)", files.len());
                self.files = files;
                self.selection.clear();
                let thumbnails = self.fetch_thumbnails(&self.files).await;
                self.thumbnails = thumbnails;
            }
            Err(e) => {
                tracing::error!("file list not loaded. Error: {e}");
                self.surface.error(&failure_message(&e, LOAD_FAILED));
            }
        }
        self.loading = false;
    }

    /// Rebuilds preview URLs for the image records currently loaded.
    pub async fn load_thumbnails(&mut self) {
        let thumbnails = self.fetch_thumbnails(&self.files).await;
        self.thumbnails = thumbnails;
    }

    pub fn set_search(&mut self, query: &str) {
        query.clone_into(&mut self.search);
    }

    /// Sort button: the active key flips direction, a new key starts ascending.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Records matching the search, in display order.
    #[must_use]
    pub fn visible(&self) -> Vec<&FileRecord> {
        query::view(&self.files, &self.search, self.sort)
    }

    /// Placeholder text when nothing is visible.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        if !query::filter(&self.files, &self.search).is_empty() {
            None
        } else if self.search.is_empty() {
            Some(NO_FILES)
        } else {
            Some(NO_MATCHES)
        }
    }

    pub fn toggle_selection(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    /// Select-all over the records matching the current search.
    pub fn toggle_select_all(&mut self) {
        let visible = query::filter(&self.files, &self.search);
        self.selection.toggle_all(&visible);
    }

    #[must_use]
    pub fn select_all_label(&self) -> &'static str {
        let visible = query::filter(&self.files, &self.search);
        if self.selection.all_selected(&visible) {
            "Deselect All"
        } else {
            "Select All"
        }
    }

    /// Opens the bulk delete confirmation. Nothing to confirm without a selection.
    pub fn request_bulk_delete(&mut self) -> bool {
        self.bulk_delete_open = !self.selection.is_empty();
        self.bulk_delete_open
    }

    pub fn cancel_bulk_delete(&mut self) {
        self.bulk_delete_open = false;
    }

    /// Deletes every selected record from storage and database.
    ///
    /// Storage objects are removed in one batch first; records without a
    /// matching object are skipped there. All selected records are then
    /// deleted from the database in one batch. The two stores are not updated
    /// atomically: when the database delete fails the removed objects stay
    /// removed and the selection is kept.
    pub async fn confirm_bulk_delete(&mut self) -> Option<DeleteResult> {
        if self.selection.is_empty() {
            self.bulk_delete_open = false;
            return None;
        }
        let session = self.session().await?;
        let ids = self.selection.ids().to_vec();
        let targets: Vec<&FileRecord> = self
            .files
            .iter()
            .filter(|f| self.selection.contains(&f.id))
            .collect();
        let blobs = self.remove_objects(&session, &targets).await;

        match self.backend.delete_files(&ids).await {
            Ok(files) => {
                tracing::info!(
                    "{} record(s) deleted. The number of records removed {} objects removed {}",
                    ids.len(),
                    files,
                    blobs
                );
                self.surface
                    .success(&format!("{} file(s) deleted successfully", ids.len()));
                self.selection.clear();
                self.bulk_delete_open = false;
                self.load_files().await;
                Some(DeleteResult { files, blobs })
            }
            Err(e) => {
                tracing::error!("records {ids:?} not deleted. Error: {e}");
                self.surface.error(&failure_message(&e, BULK_DELETE_FAILED));
                None
            }
        }
    }

    /// Deletes one record and its storage object.
    pub async fn delete_file(&mut self, id: &str) -> Option<DeleteResult> {
        let Some(record) = self.find(id).cloned() else {
            tracing::warn!("file {id} is not loaded");
            return None;
        };
        let session = self.session().await?;
        let blobs = self.remove_objects(&session, &[&record]).await;

        match self.backend.delete_files(std::slice::from_ref(&record.id)).await {
            Ok(files) => {
                tracing::info!("file: {} deleted", record.id);
                self.surface
                    .success(&format!("{} deleted successfully", record.filename));
                self.load_files().await;
                Some(DeleteResult { files, blobs })
            }
            Err(e) => {
                tracing::error!("file '{}' not deleted. Error: {e}", record.id);
                self.surface.error(&failure_message(&e, DELETE_FAILED));
                None
            }
        }
    }

    /// Opens the download confirmation for a loaded record.
    pub fn initiate_download(&mut self, id: &str) -> bool {
        match self.find(id) {
            Some(record) => {
                self.download = DownloadState::Confirming(record.clone());
                true
            }
            None => false,
        }
    }

    pub fn cancel_download(&mut self) {
        self.download = DownloadState::Idle;
    }

    /// Runs the confirmed download. Preconditions are checked in order
    /// (session, storage object, ownership) and the first failing one aborts
    /// the rest. The dialog always ends up closed.
    pub async fn confirm_download(&mut self) -> Option<PathBuf> {
        let record = match std::mem::take(&mut self.download) {
            DownloadState::Confirming(record) => record,
            other => {
                self.download = other;
                return None;
            }
        };
        self.download = DownloadState::Downloading(record.clone());
        let result = self.run_download(&record).await;
        self.download = DownloadState::Idle;

        match result {
            Ok(path) => {
                tracing::info!("file: {} saved to {}", record.filename, path.display());
                self.surface.success(DOWNLOADED);
                Some(path)
            }
            Err(e) => {
                tracing::error!("file '{}' not downloaded. Error: {e}", record.filename);
                self.surface.error(&e.to_string());
                None
            }
        }
    }

    /// Builds the share link for a record and hands it to the surface.
    pub fn share(&self, id: &str, platform: SharePlatform) -> Option<ShareAction> {
        let record = self.find(id)?;
        let action = share_action(&self.origin, record, platform);
        match &action {
            ShareAction::Open(url) => {
                if let Err(e) = self.surface.open_url(url) {
                    self.surface.error(&e.to_string());
                }
            }
            ShareAction::Copy(link) => match self.surface.copy_text(link) {
                Ok(()) => self.surface.success(LINK_COPIED),
                Err(e) => self.surface.error(&e.to_string()),
            },
        }
        Some(action)
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::collect(&self.files)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    #[must_use]
    pub fn thumbnail(&self, id: &str) -> Option<&str> {
        self.thumbnails.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn thumbnails(&self) -> &HashMap<String, String> {
        &self.thumbnails
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn sort(&self) -> SortState {
        self.sort
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn download_state(&self) -> &DownloadState {
        &self.download
    }

    #[must_use]
    pub fn is_bulk_delete_open(&self) -> bool {
        self.bulk_delete_open
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// A failed session check counts as no session.
    async fn session(&self) -> Option<Session> {
        match self.backend.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("session check failed: {e}");
                None
            }
        }
    }

    async fn fetch_thumbnails(&self, files: &[FileRecord]) -> HashMap<String, String> {
        let mut thumbnails = HashMap::new();
        let images: Vec<&FileRecord> = files.iter().filter(|f| f.is_image()).collect();
        if images.is_empty() {
            return thumbnails;
        }
        let Some(session) = self.session().await else {
            return thumbnails;
        };
        let objects = match self.backend.list_objects(&user_prefix(&session.user.id)).await {
            Ok(objects) => objects,
            Err(e) => {
                tracing::warn!("thumbnails skipped, storage listing failed: {e}");
                return thumbnails;
            }
        };
        let index = ObjectIndex::new(&session.user.id, objects);

        for record in images {
            let Some(path) = index.resolve(record) else {
                tracing::debug!("no storage object for {}", record.filename);
                continue;
            };
            match self
                .backend
                .create_signed_url(&path, self.signed_url_ttl)
                .await
            {
                Ok(url) => {
                    thumbnails.insert(record.id.clone(), url.signed_url);
                }
                Err(e) => tracing::warn!("thumbnail for {} skipped: {e}", record.filename),
            }
        }
        thumbnails
    }

    /// Removes the storage objects of `targets` and returns how many went away.
    /// Storage failures are logged and do not stop the caller.
    async fn remove_objects(&self, session: &Session, targets: &[&FileRecord]) -> usize {
        let objects = match self.backend.list_objects(&user_prefix(&session.user.id)).await {
            Ok(objects) => objects,
            Err(e) => {
                tracing::warn!("storage listing failed: {e}");
                Vec::new()
            }
        };
        let index = ObjectIndex::new(&session.user.id, objects);
        let mut paths: Vec<String> = targets.iter().filter_map(|r| index.resolve(r)).collect();
        paths.sort();
        paths.dedup();
        if paths.is_empty() {
            return 0;
        }
        match self.backend.remove(&paths).await {
            Ok(removed) => removed.len(),
            Err(e) => {
                tracing::warn!("storage objects {paths:?} not removed. Error: {e}");
                0
            }
        }
    }

    async fn run_download(&self, record: &FileRecord) -> Result<PathBuf, DownloadError> {
        let session = self.session().await.ok_or(DownloadError::NoSession)?;

        let objects = match self.backend.list_objects(&user_prefix(&session.user.id)).await {
            Ok(objects) => objects,
            Err(e) => {
                tracing::warn!("storage listing failed: {e}");
                Vec::new()
            }
        };
        let path = ObjectIndex::new(&session.user.id, objects)
            .resolve(record)
            .ok_or(DownloadError::NotInStorage)?;

        match self.backend.file_owner(&record.id).await {
            Ok(owner) if owner.user_id == session.user.id => {}
            Ok(owner) => {
                tracing::warn!(
                    "file {} belongs to {}, not to {}",
                    record.id,
                    owner.user_id,
                    session.user.id
                );
                return Err(DownloadError::Unauthorized);
            }
            Err(e) => {
                tracing::warn!("owner of {} not read: {e}", record.id);
                return Err(DownloadError::Unauthorized);
            }
        }

        let data = self
            .backend
            .download(&path)
            .await
            .map_err(|e| DownloadError::Failed(failure_message(&e, DOWNLOAD_FAILED)))?;
        tracing::info!("file size {}", data.len());
        self.surface
            .save_file(name_from_path(&record.filename), &data)
            .await
            .map_err(|e| DownloadError::Failed(failure_message(&e, DOWNLOAD_FAILED)))
    }
}

/// The error's own message, or `default` when it has none.
fn failure_message(e: &Error, default: &str) -> String {
    let message = e.to_string();
    if message.trim().is_empty() {
        default.to_owned()
    } else {
        message
    }
}
