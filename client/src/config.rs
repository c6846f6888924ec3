use std::env;

use crate::error::{Error, Result};

pub const URL_VAR: &str = "MYFILES_URL";
pub const ANON_KEY_VAR: &str = "MYFILES_ANON_KEY";
pub const ACCESS_TOKEN_VAR: &str = "MYFILES_ACCESS_TOKEN";
pub const BUCKET_VAR: &str = "MYFILES_BUCKET";
pub const TABLE_VAR: &str = "MYFILES_TABLE";
pub const ORIGIN_VAR: &str = "MYFILES_ORIGIN";
pub const SIGNED_URL_TTL_VAR: &str = "MYFILES_SIGNED_URL_TTL";

pub const DEFAULT_BUCKET: &str = "user-files";
pub const DEFAULT_TABLE: &str = "files";
/// Lifetime of thumbnail URLs, in seconds.
pub const DEFAULT_SIGNED_URL_TTL: u64 = 3600;

/// Connection and view settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URI, e.g. `https://xyz.supabase.co`
    pub uri: String,
    /// Public API key sent as `apikey` with every request
    pub anon_key: String,
    /// User access token. No token means no session.
    pub access_token: Option<String>,
    pub bucket: String,
    pub table: String,
    /// Origin used to build share links
    pub origin: String,
    pub signed_url_ttl: u64,
}

impl Config {
    #[must_use]
    pub fn new(uri: &str, anon_key: &str) -> Self {
        Self {
            uri: uri.to_owned(),
            anon_key: anon_key.to_owned(),
            access_token: None,
            bucket: String::from(DEFAULT_BUCKET),
            table: String::from(DEFAULT_TABLE),
            origin: uri.trim_end_matches('/').to_owned(),
            signed_url_ttl: DEFAULT_SIGNED_URL_TTL,
        }
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable value by name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup(URL_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config(format!("{URL_VAR} is not set")))?;
        let anon_key = lookup(ANON_KEY_VAR).unwrap_or_default();

        let mut config = Config::new(&uri, &anon_key);
        config.access_token = lookup(ACCESS_TOKEN_VAR).filter(|v| !v.is_empty());
        if let Some(bucket) = lookup(BUCKET_VAR) {
            config.bucket = bucket;
        }
        if let Some(table) = lookup(TABLE_VAR) {
            config.table = table;
        }
        if let Some(origin) = lookup(ORIGIN_VAR) {
            config.origin = origin.trim_end_matches('/').to_owned();
        }
        if let Some(ttl) = lookup(SIGNED_URL_TTL_VAR) {
            config.signed_url_ttl = ttl
                .parse()
                .map_err(|_| Error::Config(format!("{SIGNED_URL_TTL_VAR} must be a number: {ttl}")))?;
        }
        Ok(config)
    }
}
