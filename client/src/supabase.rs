//! HTTP adapter for a Supabase compatible backend: GoTrue auth, PostgREST
//! tables and the storage API.

use async_trait::async_trait;
use kernel::{FileRecord, OwnerRecord, Session, SignedUrl, StorageObject, User};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::backend::{Auth, Database, ObjectStorage};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::resource::Resource;

const API_KEY_HEADER: &str = "apikey";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const LIST_LIMIT: usize = 1000;

pub struct SupabaseBackend {
    client: Client,
    config: Config,
}

/// Error bodies differ between services, any of these fields may carry the message.
#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl SupabaseBackend {
    pub fn new(config: Config) -> Result<Self> {
        if Resource::new(&config.uri).is_none() {
            return Err(Error::InvalidUri(config.uri));
        }
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.anon_key)
            .map_err(|e| Error::Config(format!("invalid anon key: {e}")))?;
        headers.insert(API_KEY_HEADER, key);
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn resource(&self, path: &str) -> Result<Resource> {
        let mut resource =
            Resource::new(&self.config.uri).ok_or_else(|| Error::InvalidUri(self.config.uri.clone()))?;
        resource.append_path(path);
        Ok(resource)
    }

    fn table(&self) -> Result<Resource> {
        let mut resource = self.resource("rest/v1")?;
        resource.append_path(&self.config.table);
        Ok(resource)
    }

    fn storage(&self, operation: &str) -> Result<Resource> {
        let mut resource = self.resource("storage/v1/object")?;
        if !operation.is_empty() {
            resource.append_path(operation);
        }
        resource.append_path(&self.config.bucket);
        Ok(resource)
    }

    /// Bearer is the user token when there is one, the anon key otherwise.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key);
        request.header(AUTHORIZATION, format!("Bearer {token}"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        tracing::debug!("{} {}", response.url(), status);
        if status.is_success() {
            Ok(response)
        } else {
            Err(api_error(status, response).await)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn api_error(status: StatusCode, response: Response) -> Error {
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = body
        .message
        .or(body.msg)
        .or(body.error_description)
        .or(body.error)
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        });
    Error::Api { status, message }
}

fn in_list(ids: &[String]) -> String {
    let quoted = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('"', "\\\"")))
        .collect::<Vec<String>>()
        .join(",");
    format!("in.({quoted})")
}

#[async_trait]
impl Auth for SupabaseBackend {
    async fn current_session(&self) -> Result<Option<Session>> {
        let Some(token) = self.config.access_token.clone() else {
            return Ok(None);
        };
        let request = self.client.get(self.resource("auth/v1/user")?.to_string());
        match self.send_json::<User>(request).await {
            Ok(user) => Ok(Some(Session {
                access_token: token,
                user,
            })),
            Err(Error::Api { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Database for SupabaseBackend {
    async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let mut resource = self.table()?;
        resource
            .query("select", "*")
            .query("order", "created_at.desc");
        self.send_json(self.client.get(resource.to_string())).await
    }

    async fn file_owner(&self, id: &str) -> Result<OwnerRecord> {
        let mut resource = self.table()?;
        resource
            .query("select", "user_id")
            .query("id", &format!("eq.{id}"));
        let request = self
            .client
            .get(resource.to_string())
            .header(ACCEPT, SINGLE_OBJECT);
        self.send_json(request).await
    }

    async fn delete_files(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut resource = self.table()?;
        resource.query("id", &in_list(ids));
        let request = self
            .client
            .delete(resource.to_string())
            .header("Prefer", "return=representation");
        let deleted: Vec<serde_json::Value> = self.send_json(request).await?;
        Ok(deleted.len())
    }
}

#[async_trait]
impl ObjectStorage for SupabaseBackend {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StorageObject>> {
        let resource = self.storage("list")?;
        let body = json!({
            "prefix": prefix,
            "limit": LIST_LIMIT,
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" },
        });
        let request = self.client.post(resource.to_string()).json(&body);
        self.send_json(request).await
    }

    async fn create_signed_url(&self, path: &str, expires_in: u64) -> Result<SignedUrl> {
        let mut resource = self.storage("sign")?;
        resource.append_object_path(path);
        let request = self
            .client
            .post(resource.to_string())
            .json(&json!({ "expiresIn": expires_in }));
        let signed: SignedUrl = self.send_json(request).await?;
        // the API answers with a path relative to /storage/v1
        let mut absolute = self.resource("storage/v1")?.to_string();
        absolute.push_str(&signed.signed_url);
        Ok(SignedUrl {
            signed_url: absolute,
        })
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let mut resource = self.storage("")?;
        resource.append_object_path(path);
        let response = self.send(self.client.get(resource.to_string())).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn remove(&self, paths: &[String]) -> Result<Vec<StorageObject>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let resource = self.storage("")?;
        let request = self
            .client
            .delete(resource.to_string())
            .json(&json!({ "prefixes": paths }));
        self.send_json(request).await
    }
}
