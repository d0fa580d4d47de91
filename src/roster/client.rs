//! HTTP client for the roster API.
//!
//! Fetches the worker list and the signed-in user and normalizes both
//! into a [`RosterSnapshot`].

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::models::{RawUserRecord, RosterSnapshot, SnapshotSource, UserRecord};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Worker list payload: a bare array or wrapped in `data`.
///
/// Entries stay as raw JSON so one malformed user can be skipped on its own.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUserList {
    Wrapped { data: Vec<Value> },
    Bare(Vec<Value>),
}

impl RawUserList {
    fn into_vec(self) -> Vec<Value> {
        match self {
            RawUserList::Wrapped { data } => data,
            RawUserList::Bare(users) => users,
        }
    }
}

/// Current-user payload: a bare object or wrapped in `user`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCurrentUser {
    Wrapped { user: RawUserRecord },
    Bare(RawUserRecord),
}

impl RawCurrentUser {
    fn into_record(self) -> RawUserRecord {
        match self {
            RawCurrentUser::Wrapped { user } => user,
            RawCurrentUser::Bare(user) => user,
        }
    }
}

/// Snapshot file contents.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSnapshotFile {
    Full {
        users: Vec<Value>,
        #[serde(default, rename = "currentUser")]
        current_user: Option<RawUserRecord>,
    },
    Bare(Vec<Value>),
}

/// Normalize every decodable user, skipping entries that are not user objects.
fn normalize_users(values: Vec<Value>, as_of: NaiveDate) -> Vec<UserRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<RawUserRecord>(value) {
            Ok(raw) => Some(UserRecord::from_raw(raw, as_of)),
            Err(e) => {
                warn!("Skipping user record {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Client for the roster endpoints.
pub struct RosterClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

impl RosterClient {
    /// Create a client for the configured API.
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(FetchError::InvalidBaseUrl(config.base_url));
        }

        info!("Initializing roster client for {}", config.base_url);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Fetch the roster and the current user concurrently.
    pub async fn fetch_snapshot(&self, as_of: NaiveDate) -> Result<RosterSnapshot, FetchError> {
        let workers_url = self.url_for(&self.config.workers_path);

        let workers = self.get_json::<RawUserList>(&workers_url);
        let current_user = async {
            if self.config.current_user_path.trim().is_empty() {
                return Ok(None);
            }
            let url = self.url_for(&self.config.current_user_path);
            self.get_json::<RawCurrentUser>(&url).await.map(Some)
        };

        let (workers, current_user) = futures::try_join!(workers, current_user)?;

        let users = normalize_users(workers.into_vec(), as_of);
        let current_user = current_user.map(|raw| UserRecord::from_raw(raw.into_record(), as_of));

        info!(
            "Fetched {} users (current user: {})",
            users.len(),
            current_user.as_ref().map_or("none", |u| u.id.as_str())
        );

        Ok(RosterSnapshot::new(
            users,
            current_user,
            SnapshotSource::Remote(workers_url),
        ))
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(url)
            .header("Accept", "application/json");
        if let Some(ref token) = self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Load a snapshot from a JSON file holding either a bare user array or
/// `{ "users": [...], "currentUser": {...} }`.
pub fn load_snapshot_file(path: &Path, as_of: NaiveDate) -> Result<RosterSnapshot, FetchError> {
    let content = std::fs::read_to_string(path).map_err(|source| FetchError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: RawSnapshotFile =
        serde_json::from_str(&content).map_err(|source| FetchError::SnapshotParse {
            path: path.to_path_buf(),
            source,
        })?;

    let (users, current_user) = match parsed {
        RawSnapshotFile::Full {
            users,
            current_user,
        } => (users, current_user),
        RawSnapshotFile::Bare(users) => (users, None),
    };

    let users = normalize_users(users, as_of);
    let current_user = current_user.map(|raw| UserRecord::from_raw(raw, as_of));

    info!("Loaded {} users from {}", users.len(), path.display());

    Ok(RosterSnapshot::new(
        users,
        current_user,
        SnapshotSource::File(path.display().to_string()),
    ))
}
