//! Contracts of the managed backend the browser talks to.
//!
//! The backend owns authentication, durable storage and access control. The
//! browser only sequences calls against these three services.

use async_trait::async_trait;
use kernel::{FileRecord, OwnerRecord, Session, SignedUrl, StorageObject};

use crate::error::Result;

#[async_trait]
pub trait Auth: Send + Sync {
    /// Current session, `None` when nobody is logged in.
    async fn current_session(&self) -> Result<Option<Session>>;
}

#[async_trait]
pub trait Database: Send + Sync {
    /// All records of the current user, newest first.
    async fn list_files(&self) -> Result<Vec<FileRecord>>;

    /// Owner column of a single record.
    async fn file_owner(&self, id: &str) -> Result<OwnerRecord>;

    /// Deletes the records with the given ids and returns how many were removed.
    async fn delete_files(&self, ids: &[String]) -> Result<usize>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Objects directly under `prefix`, names relative to it.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StorageObject>>;

    async fn create_signed_url(&self, path: &str, expires_in: u64) -> Result<SignedUrl>;

    async fn download(&self, path: &str) -> Result<Vec<u8>>;

    /// Removes objects by full path and returns the removed ones.
    async fn remove(&self, paths: &[String]) -> Result<Vec<StorageObject>>;
}

/// Everything the browser needs from the backend.
pub trait Backend: Auth + Database + ObjectStorage {}

impl<T: Auth + Database + ObjectStorage> Backend for T {}
