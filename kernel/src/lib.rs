#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata row describing one uploaded file.
///
/// Rows are created by the upload flow and owned by the database. The browser
/// only keeps a read-only copy and never mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique identifier of the row
    pub id: String,
    /// Display name of the file
    pub filename: String,
    /// Declared size in bytes
    pub file_size: u64,
    /// Declared media type, e.g. `image/png`
    pub file_type: String,
    /// Content identifier used by the verification link
    pub cid: String,
    /// Upload time
    pub created_at: DateTime<Utc>,
    /// Set externally once the content has been verified
    #[serde(default)]
    pub blockchain_verified: bool,
    /// Exact object path inside the storage bucket, when the upload flow recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

impl FileRecord {
    /// Whether the declared media type is an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image/")
    }
}

/// Single column projection used to re-check record ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub user_id: String,
}

/// Object stored in the storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageObject {
    /// Object name relative to the listed prefix
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMetadata>,
}

impl StorageObject {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "mimetype")]
    pub mime_type: Option<String>,
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Active session returned by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

/// Time limited, pre-authorized URL for one storage object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrl {
    #[serde(rename = "signedURL")]
    pub signed_url: String,
}

/// Result of a delete operation showing the number of items removed.
///
/// Distinguishes between file metadata records and storage objects because
/// both stores are updated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeleteResult {
    /// Number of file metadata records deleted
    pub files: usize,
    /// Number of storage objects deleted
    pub blobs: usize,
}

/// Error returned when parsing one of the tag enums from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownTag {}

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($tag => Ok($name::$variant),)+
                    _ => Err(UnknownTag {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

tag_enum!(
    /// Column the file list is sorted by.
    SortKey, "sort key", {
        Name => "name",
        Date => "date",
        Size => "size",
        Verified => "verified",
    }
);

tag_enum!(
    SortDirection, "sort direction", {
        Asc => "asc",
        Desc => "desc",
    }
);

tag_enum!(
    /// Target of the share action.
    SharePlatform, "share platform", {
        WhatsApp => "whatsapp",
        Gmail => "gmail",
        Telegram => "telegram",
        Copy => "copy",
    }
);

tag_enum!(
    /// Named views the browser can redirect to.
    Route, "route", {
        Login => "login",
    }
);

impl SortDirection {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}
