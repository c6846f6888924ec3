use kernel::{FileRecord, SharePlatform};
use urlencoding::encode;

/// What a share action should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    /// Open a web intent of a messaging app.
    Open(String),
    /// Put the link on the clipboard.
    Copy(String),
}

/// Verification link for the record's content identifier.
#[must_use]
pub fn verify_link(origin: &str, record: &FileRecord) -> String {
    format!("{}/verify?cid={}", origin.trim_end_matches('/'), record.cid)
}

#[must_use]
pub fn share_text(record: &FileRecord) -> String {
    format!("Check out my file: {}", record.filename)
}

#[must_use]
pub fn share_action(origin: &str, record: &FileRecord, platform: SharePlatform) -> ShareAction {
    let link = verify_link(origin, record);
    let text = share_text(record);
    match platform {
        SharePlatform::WhatsApp => ShareAction::Open(format!(
            "https://wa.me/?text={}",
            encode(&format!("{text} {link}"))
        )),
        SharePlatform::Gmail => ShareAction::Open(format!(
            "https://mail.google.com/mail/?view=cm&su={}&body={}",
            encode(&record.filename),
            encode(&format!("{text}\n\n{link}"))
        )),
        SharePlatform::Telegram => ShareAction::Open(format!(
            "https://t.me/share/url?url={}&text={}",
            encode(&link),
            encode(&text)
        )),
        SharePlatform::Copy => ShareAction::Copy(link),
    }
}
