//! Data models for roster reporting.
//!
//! This module contains the normalized user record, the raw wire shape
//! returned by the roster API, and the small value types shared by the
//! aggregation and report modules.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Label used wherever a role or location is missing.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Sentinel filter value that matches every record.
pub const ALL_SENTINEL: &str = "All";

/// Employment status of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Currently working
    Active,
    /// Temporarily away
    OnLeave,
    /// No longer working
    Inactive,
    /// A label the backend introduced that we don't model
    Other(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Active => write!(f, "Active"),
            Status::OnLeave => write!(f, "On Leave"),
            Status::Inactive => write!(f, "Inactive"),
            Status::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "active" => Status::Active,
            "on leave" | "on_leave" | "onleave" | "on-leave" => Status::OnLeave,
            "inactive" => Status::Inactive,
            _ => Status::Other(s.trim().to_string()),
        }
    }
}

impl Status {
    /// Returns the display label used by filters and exports.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

/// A filter selection: either the `All` sentinel or an exact label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Exactly(String),
}

impl Selection {
    /// Returns true if `label` passes this selection.
    pub fn matches(&self, label: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Exactly(wanted) => label == Some(wanted.as_str()),
        }
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        if s == ALL_SENTINEL {
            Selection::All
        } else {
            Selection::Exactly(s.to_string())
        }
    }
}

impl From<String> for Selection {
    fn from(s: String) -> Self {
        Selection::from(s.as_str())
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        selection.to_string()
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "{}", ALL_SENTINEL),
            Selection::Exactly(s) => write!(f, "{}", s),
        }
    }
}

/// A normalized, read-only user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Opaque unique identifier.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Free-form role label (None when the source omitted it).
    pub role: Option<String>,
    pub email: String,
    /// Free-form location (None when the source omitted it).
    pub location: Option<String>,
    /// Join date. None means "joined now" for tenure purposes.
    pub join_date: Option<NaiveDate>,
    /// Employment status as observed; never fabricated.
    pub status: Option<Status>,
    /// Whole months since `join_date`, computed at read time. Negative for
    /// join dates in the future.
    pub experience_months: i64,
}

impl UserRecord {
    /// Normalize a raw API record against the given read date.
    pub fn from_raw(raw: RawUserRecord, as_of: NaiveDate) -> Self {
        let (first_name, last_name) = match (raw.first_name, raw.last_name, raw.name) {
            (Some(first), last, _) => (first, last.unwrap_or_default()),
            (None, last, Some(full)) => split_full_name(&full, last),
            (None, last, None) => (String::new(), last.unwrap_or_default()),
        };

        let id = raw
            .id
            .or(raw.object_id)
            .map(|id| id.to_string())
            .unwrap_or_default();
        let join_date = raw.join_date.as_deref().and_then(|s| {
            let parsed = parse_join_date(s);
            if parsed.is_none() {
                warn!("Unparseable join date {:?} for user {}", s, id);
            }
            parsed
        });

        let experience_months = join_date
            .map(|date| months_between(date, as_of))
            .unwrap_or(0);

        if experience_months < 0 {
            debug!(
                "User {} has a future join date; experience is {} months",
                id, experience_months
            );
        }

        Self {
            id,
            first_name,
            last_name,
            role: non_empty(raw.role),
            email: raw.email.unwrap_or_default(),
            location: non_empty(raw.location),
            join_date,
            status: non_empty(raw.status).map(|s| Status::from(s.as_str())),
            experience_months,
        }
    }

    /// Role as displayed, falling back to `Unknown`.
    pub fn role_label(&self) -> &str {
        self.role.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    /// Location as displayed, falling back to `Unknown`.
    pub fn location_label(&self) -> &str {
        self.location.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    pub fn status_label(&self) -> Option<String> {
        self.status.as_ref().map(Status::label)
    }

    /// Status as displayed and filtered, falling back to `Unknown`.
    pub fn status_display_label(&self) -> String {
        self.status_label()
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    pub fn is_active(&self) -> bool {
        self.status == Some(Status::Active)
    }
}

/// Identifier as sent by the API: some backends use numbers, some strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(s) => write!(f, "{}", s),
            RawId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A user object as returned by the roster API. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    /// Document id used by Mongo-style backends, often sent next to `id`.
    #[serde(default, rename = "_id")]
    pub object_id: Option<RawId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Single display name, used when first/last are absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Where a roster snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum SnapshotSource {
    Remote(String),
    File(String),
    Sample,
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::Remote(url) => write!(f, "API ({})", url),
            SnapshotSource::File(path) => write!(f, "file ({})", path),
            SnapshotSource::Sample => write!(f, "generated sample data"),
        }
    }
}

/// A roster fetched once per report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub users: Vec<UserRecord>,
    pub current_user: Option<UserRecord>,
    pub fetched_at: DateTime<Utc>,
    pub source: SnapshotSource,
}

impl RosterSnapshot {
    /// Build a snapshot, listing the current user alongside the roster
    /// unless their id is already present.
    pub fn new(
        mut users: Vec<UserRecord>,
        current_user: Option<UserRecord>,
        source: SnapshotSource,
    ) -> Self {
        if let Some(ref me) = current_user {
            if !users.iter().any(|u| u.id == me.id) {
                users.push(me.clone());
            }
        }

        Self {
            users,
            current_user,
            fetched_at: Utc::now(),
            source,
        }
    }
}

/// A named count in a frequency distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub label: String,
    pub count: usize,
}

impl DistributionBucket {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Scalar statistics over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub total: usize,
    pub distinct_roles: usize,
    pub active_count: usize,
    pub avg_experience_months: i64,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the roster came from.
    pub source: SnapshotSource,
    /// When the roster was fetched.
    pub fetched_at: DateTime<Utc>,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    pub role_filter: Selection,
    pub status_filter: Selection,
    /// Users in the unfiltered roster.
    pub records_total: usize,
    /// Users that passed the filters.
    pub records_matched: usize,
    /// Role labels available for filtering.
    pub available_roles: Vec<String>,
    /// Status labels available for filtering.
    pub available_statuses: Vec<String>,
}

/// The complete roster report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: RosterSummary,
    pub by_role: Vec<DistributionBucket>,
    pub by_experience: Vec<DistributionBucket>,
    pub by_location: Vec<DistributionBucket>,
}

/// Whole months from `from` to `to`, ignoring the day of month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a date.
pub fn parse_join_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.date_naive());
    }
    // Timestamps without an offset, e.g. "2021-03-04T10:00:00"
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn split_full_name(full: &str, last: Option<String>) -> (String, String) {
    let mut parts = full.trim().splitn(2, ' ');
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.next().map(|s| s.trim().to_string());
    (first, last.or(rest).unwrap_or_default())
}
