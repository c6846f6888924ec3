use std::env;
use std::path::PathBuf;

use clap::ArgMatches;
use client::config::{ACCESS_TOKEN_VAR, ANON_KEY_VAR, ORIGIN_VAR, URL_VAR};
use client::backend::Backend;
use client::query::SortState;
use client::render;
use client::surface::Surface;
use client::{Config, FileBrowser, SupabaseBackend};
use kernel::{SharePlatform, SortDirection, SortKey};

use super::terminal::{TerminalSurface, confirm};

type Browser = FileBrowser<SupabaseBackend, TerminalSurface>;

/// Reads the configuration from the environment, letting the global flags win.
pub fn config(matches: &ArgMatches) -> client::Result<Config> {
    let flag = |name: &str| matches.get_one::<String>(name).cloned();
    Config::from_lookup(|key| {
        let overridden = match key {
            URL_VAR => flag("uri"),
            ANON_KEY_VAR => flag("key"),
            ACCESS_TOKEN_VAR => flag("token"),
            ORIGIN_VAR => flag("origin"),
            _ => None,
        };
        overridden.or_else(|| env::var(key).ok())
    })
}

/// Connects to the backend and mounts the view. `None` means the user must
/// login first or the backend is misconfigured; the reason is already reported.
async fn open(config: &Config, out_dir: PathBuf) -> Option<Browser> {
    let backend = match SupabaseBackend::new(config.clone()) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("backend not created. Error: {e}");
            eprintln!("error: {e}");
            return None;
        }
    };
    let mut browser = FileBrowser::from_config(backend, TerminalSurface::new(out_dir), config);
    if browser.mount().await {
        Some(browser)
    } else {
        None
    }
}

fn sort_state(matches: &ArgMatches) -> SortState {
    let desc = matches.get_flag("desc");
    match matches.get_one::<SortKey>("sort") {
        Some(key) => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            SortState::new(*key, direction)
        }
        None => SortState::default(),
    }
}

/// Selects every loaded id once, however often it was given, and returns
/// the ids that are not loaded.
fn select_ids<'a, B: Backend, S: Surface>(
    browser: &mut FileBrowser<B, S>,
    ids: &'a [String],
) -> Vec<&'a str> {
    let mut missing = Vec::new();
    for id in ids {
        if browser.find(id).is_none() {
            missing.push(id.as_str());
        } else if !browser.selection().contains(id) {
            browser.toggle_selection(id);
        }
    }
    missing
}

pub async fn list(config: &Config, matches: &ArgMatches) -> bool {
    let Some(mut browser) = open(config, PathBuf::from(".")).await else {
        return false;
    };
    if let Some(query) = matches.get_one::<String>("search") {
        browser.set_search(query);
    }
    browser.set_sort(sort_state(matches));
    println!("{}", render::view(&browser));
    true
}

pub async fn download(config: &Config, matches: &ArgMatches) -> bool {
    let out_dir = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let Some(id) = matches.get_one::<String>("id") else {
        return false;
    };
    let Some(mut browser) = open(config, out_dir).await else {
        return false;
    };
    if !browser.initiate_download(id) {
        eprintln!("error: file {id} not found");
        return false;
    }
    let question = browser
        .find(id)
        .map(|f| format!("Download {} ({})?", f.filename, f.cid))
        .unwrap_or_default();
    if !matches.get_flag("yes") && !confirm(&question) {
        browser.cancel_download();
        return true;
    }
    browser.confirm_download().await.is_some()
}

pub async fn delete(config: &Config, matches: &ArgMatches) -> bool {
    let Some(mut browser) = open(config, PathBuf::from(".")).await else {
        return false;
    };
    if matches.get_flag("all") {
        if let Some(query) = matches.get_one::<String>("search") {
            browser.set_search(query);
        }
        browser.toggle_select_all();
    } else {
        let ids: Vec<String> = matches
            .get_many::<String>("id")
            .map(|ids| ids.cloned().collect())
            .unwrap_or_default();
        for id in select_ids(&mut browser, &ids) {
            eprintln!("error: file {id} not found");
        }
    }

    if !browser.request_bulk_delete() {
        println!("Nothing to delete");
        return true;
    }
    let count = browser.selection().len();
    let question = format!("Delete {count} file(s)? This cannot be undone.");
    if !matches.get_flag("yes") && !confirm(&question) {
        browser.cancel_bulk_delete();
        return true;
    }
    browser.confirm_bulk_delete().await.is_some()
}

pub async fn share(config: &Config, matches: &ArgMatches) -> bool {
    let (Some(id), Some(platform)) = (
        matches.get_one::<String>("id"),
        matches.get_one::<SharePlatform>("platform"),
    ) else {
        return false;
    };
    let Some(browser) = open(config, PathBuf::from(".")).await else {
        return false;
    };
    if browser.share(id, *platform).is_none() {
        eprintln!("error: file {id} not found");
        return false;
    }
    true
}
