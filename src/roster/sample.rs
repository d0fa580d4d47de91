//! Sample roster generation.
//!
//! Produces a randomized demo roster for offline runs or when the caller
//! chooses to degrade to demo data after a failed fetch.

use crate::config::FallbackConfig;
use crate::error::FetchError;
use crate::models::{months_between, RosterSnapshot, SnapshotSource, Status, UserRecord};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

/// Default number of generated users.
pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Id prefix marking generated records.
pub const SAMPLE_ID_PREFIX: &str = "sample-";

const ROLES: &[&str] = &["Owner", "Manager", "Supervisor", "Worker"];
const LOCATIONS: &[&str] = &["Main Plant", "Warehouse", "Assembly Line", "Quality Lab", "Dock"];
const FIRST_NAMES: &[&str] = &["Amina", "Bruno", "Chen", "Dana", "Emeka", "Farah", "Goran", "Hana"];
const LAST_NAMES: &[&str] = &["Adeyemi", "Baptiste", "Costa", "Dubois", "Eriksen", "Fujita"];

/// Oldest generated join date, in days before `as_of`.
const MAX_TENURE_DAYS: i64 = 365 * 10;

/// Generate `count` users with random role, location, status and join date.
pub fn generate_sample_roster<R: Rng>(
    count: usize,
    rng: &mut R,
    as_of: NaiveDate,
) -> Vec<UserRecord> {
    (1..=count)
        .map(|n| {
            let first_name = pick(FIRST_NAMES, rng);
            let last_name = pick(LAST_NAMES, rng);
            let join_date = as_of - Duration::days(rng.gen_range(0..=MAX_TENURE_DAYS));
            let status = match rng.gen_range(0..10) {
                0 => Status::Inactive,
                1 | 2 => Status::OnLeave,
                _ => Status::Active,
            };

            UserRecord {
                id: format!("{}{}", SAMPLE_ID_PREFIX, n),
                email: format!(
                    "{}.{}{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase(),
                    n
                ),
                first_name,
                last_name,
                role: Some(pick(ROLES, rng)),
                location: Some(pick(LOCATIONS, rng)),
                join_date: Some(join_date),
                status: Some(status),
                experience_months: months_between(join_date, as_of),
            }
        })
        .collect()
}

/// A snapshot of generated users with no current user.
pub fn sample_snapshot<R: Rng>(
    count: usize,
    rng: &mut R,
    as_of: NaiveDate,
) -> RosterSnapshot {
    RosterSnapshot::new(
        generate_sample_roster(count, rng, as_of),
        None,
        SnapshotSource::Sample,
    )
}

/// Resolve a fetch result, substituting sample data for a failure only when
/// `fallback.sample_on_error` is set.
///
/// On substitution the replaced error is returned alongside the snapshot so
/// the caller can tell the user.
pub fn or_sample_snapshot<R: Rng>(
    result: Result<RosterSnapshot, FetchError>,
    fallback: &FallbackConfig,
    rng: &mut R,
    as_of: NaiveDate,
) -> Result<(RosterSnapshot, Option<FetchError>), FetchError> {
    match result {
        Ok(snapshot) => Ok((snapshot, None)),
        Err(e) if fallback.sample_on_error => {
            warn!("Roster fetch failed, using sample data: {}", e);
            let snapshot = sample_snapshot(fallback.sample_count, rng, as_of);
            Ok((snapshot, Some(e)))
        }
        Err(e) => Err(e),
    }
}

fn pick<R: Rng>(choices: &[&str], rng: &mut R) -> String {
    choices.choose(rng).copied().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_generates_requested_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let users = generate_sample_roster(DEFAULT_SAMPLE_COUNT, &mut rng, as_of());

        assert_eq!(users.len(), DEFAULT_SAMPLE_COUNT);
        assert!(users.iter().all(|u| u.id.starts_with(SAMPLE_ID_PREFIX)));
        assert!(users.iter().all(|u| u.status.is_some() && u.role.is_some()));
    }

    #[test]
    fn test_join_dates_within_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let users = generate_sample_roster(50, &mut rng, as_of());

        for user in &users {
            let join_date = user.join_date.unwrap();
            assert!(join_date <= as_of());
            assert!(user.experience_months >= 0);
            assert!(user.experience_months <= 121);
        }
    }

    #[test]
    fn test_same_seed_same_roster() {
        let a = generate_sample_roster(5, &mut StdRng::seed_from_u64(3), as_of());
        let b = generate_sample_roster(5, &mut StdRng::seed_from_u64(3), as_of());
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_snapshot_source() {
        let snapshot = sample_snapshot(3, &mut StdRng::seed_from_u64(1), as_of());
        assert_eq!(snapshot.source, SnapshotSource::Sample);
        assert!(snapshot.current_user.is_none());
        assert_eq!(snapshot.users.len(), 3);
    }

    fn fetch_failure() -> Result<RosterSnapshot, FetchError> {
        Err(FetchError::Status {
            url: "http://factory.local/api/workers".to_string(),
            status: 503,
        })
    }

    #[test]
    fn test_fallback_disabled_keeps_error() {
        let fallback = FallbackConfig {
            sample_on_error: false,
            sample_count: 5,
        };
        let result =
            or_sample_snapshot(fetch_failure(), &fallback, &mut StdRng::seed_from_u64(1), as_of());

        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    }

    #[test]
    fn test_fallback_enabled_uses_sample() {
        let fallback = FallbackConfig {
            sample_on_error: true,
            sample_count: 5,
        };
        let (snapshot, replaced) =
            or_sample_snapshot(fetch_failure(), &fallback, &mut StdRng::seed_from_u64(1), as_of())
                .unwrap();

        assert_eq!(snapshot.source, SnapshotSource::Sample);
        assert_eq!(snapshot.users.len(), 5);
        assert!(matches!(replaced, Some(FetchError::Status { .. })));
    }

    #[test]
    fn test_fallback_passes_success_through() {
        let fetched = RosterSnapshot::new(
            Vec::new(),
            None,
            SnapshotSource::Remote("http://factory.local/api/workers".to_string()),
        );
        let fallback = FallbackConfig {
            sample_on_error: true,
            ..FallbackConfig::default()
        };
        let (snapshot, replaced) =
            or_sample_snapshot(Ok(fetched), &fallback, &mut StdRng::seed_from_u64(1), as_of())
                .unwrap();

        assert!(matches!(snapshot.source, SnapshotSource::Remote(_)));
        assert!(replaced.is_none());
    }
}
