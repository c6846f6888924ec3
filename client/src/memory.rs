//! In-process backend and surface.
//!
//! Keeps records and objects in memory and records every call, which makes
//! it useful for tests and for trying the browser without a network.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use kernel::{FileRecord, OwnerRecord, Route, Session, SignedUrl, StorageObject, User};
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::backend::{Auth, Database, ObjectStorage};
use crate::error::{Error, Result};
use crate::surface::{Desktop, Navigator, Notifier};

/// Backend operations, as recorded in [`MemoryBackend::calls`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Session,
    ListFiles,
    FileOwner(String),
    DeleteFiles(Vec<String>),
    ListObjects(String),
    SignUrl(String, u64),
    Download(String),
    Remove(Vec<String>),
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Failure {
    Session,
    ListFiles,
    FileOwner,
    DeleteFiles,
    ListObjects,
    SignUrl,
    Download,
    Remove,
}

#[derive(Default)]
struct State {
    session: Option<Session>,
    records: Vec<(FileRecord, String)>,
    objects: BTreeMap<String, Vec<u8>>,
    failures: BTreeMap<Failure, String>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs `user_id` in.
    pub fn login(&self, user_id: &str) {
        self.state.lock().session = Some(Session {
            access_token: format!("token-{user_id}"),
            user: User {
                id: user_id.to_owned(),
                email: None,
            },
        });
    }

    pub fn logout(&self) {
        self.state.lock().session = None;
    }

    /// Adds a record owned by `owner`.
    pub fn insert_record(&self, record: FileRecord, owner: &str) {
        self.state.lock().records.push((record, owner.to_owned()));
    }

    /// Adds an object under its full path, e.g. `u1/1700000000_photo.png`.
    pub fn insert_object(&self, path: &str, data: &[u8]) {
        self.state
            .lock()
            .objects
            .insert(path.to_owned(), data.to_vec());
    }

    pub fn fail(&self, operation: Failure, message: &str) {
        self.state
            .lock()
            .failures
            .insert(operation, message.to_owned());
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    #[must_use]
    pub fn record_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .records
            .iter()
            .map(|(r, _)| r.id.clone())
            .collect()
    }

    #[must_use]
    pub fn object_paths(&self) -> Vec<String> {
        self.state.lock().objects.keys().cloned().collect()
    }

    fn enter(&self, call: Call, failure: Failure) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.failures.get(&failure) {
            Some(message) => Err(Error::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn current_user(&self) -> Option<String> {
        self.state.lock().session.as_ref().map(|s| s.user.id.clone())
    }
}

fn not_found(what: &str) -> Error {
    Error::Api {
        status: StatusCode::NOT_FOUND,
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl Auth for MemoryBackend {
    async fn current_session(&self) -> Result<Option<Session>> {
        self.enter(Call::Session, Failure::Session)?;
        Ok(self.state.lock().session.clone())
    }
}

#[async_trait]
impl Database for MemoryBackend {
    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        self.enter(Call::ListFiles, Failure::ListFiles)?;
        let user = self.current_user();
        let mut records: Vec<FileRecord> = self
            .state
            .lock()
            .records
            .iter()
            .filter(|(_, owner)| Some(owner) == user.as_ref())
            .map(|(r, _)| r.clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn file_owner(&self, id: &str) -> Result<OwnerRecord> {
        self.enter(Call::FileOwner(id.to_owned()), Failure::FileOwner)?;
        self.state
            .lock()
            .records
            .iter()
            .find(|(r, _)| r.id == id)
            .map(|(_, owner)| OwnerRecord {
                user_id: owner.clone(),
            })
            .ok_or_else(|| not_found("record"))
    }

    async fn delete_files(&self, ids: &[String]) -> Result<usize> {
        self.enter(Call::DeleteFiles(ids.to_vec()), Failure::DeleteFiles)?;
        let mut state = self.state.lock();
        let before = state.records.len();
        state.records.retain(|(r, _)| !ids.contains(&r.id));
        Ok(before - state.records.len())
    }
}

#[async_trait]
impl ObjectStorage for MemoryBackend {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StorageObject>> {
        self.enter(Call::ListObjects(prefix.to_owned()), Failure::ListObjects)?;
        let folder = format!("{}/", prefix.trim_end_matches('/'));
        Ok(self
            .state
            .lock()
            .objects
            .keys()
            .filter_map(|path| path.strip_prefix(&folder))
            .filter(|name| !name.contains('/'))
            .map(StorageObject::named)
            .collect())
    }

    async fn create_signed_url(&self, path: &str, expires_in: u64) -> Result<SignedUrl> {
        self.enter(Call::SignUrl(path.to_owned(), expires_in), Failure::SignUrl)?;
        if !self.state.lock().objects.contains_key(path) {
            return Err(not_found("object"));
        }
        Ok(SignedUrl {
            signed_url: format!("memory://{path}?expires_in={expires_in}"),
        })
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.enter(Call::Download(path.to_owned()), Failure::Download)?;
        self.state
            .lock()
            .objects
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("object"))
    }

    async fn remove(&self, paths: &[String]) -> Result<Vec<StorageObject>> {
        self.enter(Call::Remove(paths.to_vec()), Failure::Remove)?;
        let mut state = self.state.lock();
        Ok(paths
            .iter()
            .filter(|p| state.objects.remove(p.as_str()).is_some())
            .map(|p| StorageObject::named(p.as_str()))
            .collect())
    }
}

/// Something the surface was asked to show or do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Success(String),
    Error(String),
    Redirect(Route),
    Open(String),
    Copy(String),
    Save(String, Vec<u8>),
}

/// Surface that records every event instead of showing it.
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<Event>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Most recent notification, success or error.
    #[must_use]
    pub fn last_message(&self) -> Option<Event> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|e| matches!(e, Event::Success(_) | Event::Error(_)))
            .cloned()
    }

    fn push(&self, event: Event) {
        self.events.lock().push(event);
    }
}

impl Notifier for RecordingSurface {
    fn success(&self, message: &str) {
        self.push(Event::Success(message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.push(Event::Error(message.to_owned()));
    }
}

impl Navigator for RecordingSurface {
    fn redirect(&self, route: Route) {
        self.push(Event::Redirect(route));
    }
}

#[async_trait]
impl Desktop for RecordingSurface {
    fn open_url(&self, url: &str) -> Result<()> {
        self.push(Event::Open(url.to_owned()));
        Ok(())
    }

    fn copy_text(&self, text: &str) -> Result<()> {
        self.push(Event::Copy(text.to_owned()));
        Ok(())
    }

    async fn save_file(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        self.push(Event::Save(file_name.to_owned(), data.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
