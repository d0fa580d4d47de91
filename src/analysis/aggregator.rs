//! Roster filtering and distribution statistics.
//!
//! Every function here is a pure transform over a snapshot slice. Callers
//! re-run the whole pipeline from the unfiltered roster whenever a filter
//! changes.

use crate::models::{DistributionBucket, RosterSummary, Selection, UserRecord};
use std::collections::HashSet;

/// Experience buckets as `(label, exclusive upper bound in months)`.
/// The last bucket has no upper bound.
pub const EXPERIENCE_BUCKETS: [(&str, Option<i64>); 5] = [
    ("Less than 6 months", Some(6)),
    ("6-12 months", Some(12)),
    ("1-2 years", Some(24)),
    ("2-5 years", Some(60)),
    ("More than 5 years", None),
];

/// Keep records whose role and status both pass their selection.
pub fn filter(
    records: &[UserRecord],
    role_filter: &Selection,
    status_filter: &Selection,
) -> Vec<UserRecord> {
    records
        .iter()
        .filter(|r| role_filter.matches(Some(r.role_label())))
        .filter(|r| status_filter.matches(Some(r.status_display_label().as_str())))
        .cloned()
        .collect()
}

/// Count occurrences of each label, preserving first-seen order.
fn count_in_order<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<DistributionBucket> {
    let mut buckets: Vec<DistributionBucket> = Vec::new();

    for label in labels {
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(DistributionBucket::new(label, 1)),
        }
    }

    buckets
}

/// One bucket per distinct role, in first-seen order.
pub fn aggregate_by_role(records: &[UserRecord]) -> Vec<DistributionBucket> {
    count_in_order(records.iter().map(UserRecord::role_label))
}

/// One bucket per distinct location, in first-seen order.
pub fn aggregate_by_location(records: &[UserRecord]) -> Vec<DistributionBucket> {
    count_in_order(records.iter().map(UserRecord::location_label))
}

/// Index into [`EXPERIENCE_BUCKETS`] for a tenure in months.
pub fn experience_bucket_index(months: i64) -> usize {
    EXPERIENCE_BUCKETS
        .iter()
        .position(|(_, upper)| upper.map_or(true, |limit| months < limit))
        .unwrap_or(EXPERIENCE_BUCKETS.len() - 1)
}

/// The fixed five tenure buckets, always all present.
pub fn aggregate_by_experience(records: &[UserRecord]) -> Vec<DistributionBucket> {
    let mut counts = [0usize; EXPERIENCE_BUCKETS.len()];

    for record in records {
        counts[experience_bucket_index(record.experience_months)] += 1;
    }

    EXPERIENCE_BUCKETS
        .iter()
        .zip(counts)
        .map(|((label, _), count)| DistributionBucket::new(*label, count))
        .collect()
}

/// Scalar statistics. All zero for an empty slice.
pub fn summarize(records: &[UserRecord]) -> RosterSummary {
    if records.is_empty() {
        return RosterSummary::default();
    }

    let roles: HashSet<&str> = records.iter().map(UserRecord::role_label).collect();
    let total_experience: i64 = records.iter().map(|r| r.experience_months).sum();

    RosterSummary {
        total: records.len(),
        distinct_roles: roles.len(),
        active_count: records.iter().filter(|r| r.is_active()).count(),
        avg_experience_months: round_half_up(total_experience as f64 / records.len() as f64),
    }
}

/// Distinct role labels in first-seen order.
pub fn distinct_roles(records: &[UserRecord]) -> Vec<String> {
    aggregate_by_role(records)
        .into_iter()
        .map(|b| b.label)
        .collect()
}

/// Distinct status labels in first-seen order, with a missing status as
/// `Unknown`.
pub fn distinct_statuses(records: &[UserRecord]) -> Vec<String> {
    let labels: Vec<String> = records.iter().map(UserRecord::status_display_label).collect();
    count_in_order(labels.iter().map(String::as_str))
        .into_iter()
        .map(|b| b.label)
        .collect()
}

/// Share of `count` in `total` as a percentage; zero when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}

/// Round halves toward positive infinity, so 2.5 -> 3 and -2.5 -> -2.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn create_test_user(role: &str, status: Status, experience: i64) -> UserRecord {
        UserRecord {
            id: format!("{}-{}", role, experience),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: Some(role.to_string()),
            email: "test@example.com".to_string(),
            location: Some("Main Plant".to_string()),
            join_date: None,
            status: Some(status),
            experience_months: experience,
        }
    }

    fn scenario() -> Vec<UserRecord> {
        vec![
            create_test_user("Worker", Status::Active, 3),
            create_test_user("Worker", Status::Inactive, 30),
            create_test_user("Manager", Status::Active, 70),
        ]
    }

    fn counts(buckets: &[DistributionBucket]) -> Vec<usize> {
        buckets.iter().map(|b| b.count).collect()
    }

    #[test]
    fn test_scenario_distributions() {
        let records = scenario();

        assert_eq!(
            aggregate_by_role(&records),
            vec![
                DistributionBucket::new("Worker", 2),
                DistributionBucket::new("Manager", 1)
            ]
        );
        assert_eq!(counts(&aggregate_by_experience(&records)), vec![1, 0, 0, 1, 1]);
        assert_eq!(
            summarize(&records),
            RosterSummary {
                total: 3,
                distinct_roles: 2,
                active_count: 2,
                avg_experience_months: 34,
            }
        );
    }

    #[test]
    fn test_filter_by_role_and_status() {
        let records = scenario();

        let workers = filter(&records, &Selection::from("Worker"), &Selection::All);
        assert_eq!(workers.len(), 2);

        let active_workers = filter(
            &records,
            &Selection::from("Worker"),
            &Selection::from("Active"),
        );
        assert_eq!(active_workers.len(), 1);
        assert_eq!(active_workers[0].experience_months, 3);

        let none = filter(&records, &Selection::from("Owner"), &Selection::All);
        assert!(none.is_empty());
        assert_eq!(summarize(&none), RosterSummary::default());
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = scenario();
        let active = filter(&records, &Selection::All, &Selection::from("Active"));
        let roles: Vec<_> = active.iter().map(|r| r.role_label()).collect();
        assert_eq!(roles, vec!["Worker", "Manager"]);
    }

    #[test]
    fn test_missing_status_matches_unknown() {
        let mut user = create_test_user("Worker", Status::Active, 1);
        user.status = None;
        let records = vec![user, create_test_user("Worker", Status::Active, 2)];

        assert_eq!(filter(&records, &Selection::All, &Selection::All).len(), 2);

        let active = filter(&records, &Selection::All, &Selection::from("Active"));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].experience_months, 2);

        let unknown = filter(&records, &Selection::All, &Selection::from("Unknown"));
        assert_eq!(unknown.len(), 1);
        assert!(unknown[0].status.is_none());
    }

    #[test]
    fn test_bucket_sums_match_filtered_len() {
        let mut records = scenario();
        records.push(create_test_user("Supervisor", Status::OnLeave, 12));
        records[1].location = None;

        for role in ["All", "Worker", "Manager", "Supervisor", "Owner"] {
            let filtered = filter(&records, &Selection::from(role), &Selection::All);
            let n = filtered.len();

            assert_eq!(counts(&aggregate_by_role(&filtered)).iter().sum::<usize>(), n);
            assert_eq!(counts(&aggregate_by_location(&filtered)).iter().sum::<usize>(), n);
            assert_eq!(counts(&aggregate_by_experience(&filtered)).iter().sum::<usize>(), n);
        }
    }

    #[test]
    fn test_experience_always_five_buckets() {
        let buckets = aggregate_by_experience(&[]);
        let labels: Vec<_> = buckets.iter().map(|b| b.label.as_str()).collect();

        assert_eq!(
            labels,
            vec![
                "Less than 6 months",
                "6-12 months",
                "1-2 years",
                "2-5 years",
                "More than 5 years"
            ]
        );
        assert_eq!(counts(&buckets), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_experience_boundaries() {
        assert_eq!(experience_bucket_index(5), 0);
        assert_eq!(experience_bucket_index(6), 1);
        assert_eq!(experience_bucket_index(11), 1);
        assert_eq!(experience_bucket_index(12), 2);
        assert_eq!(experience_bucket_index(24), 3);
        assert_eq!(experience_bucket_index(59), 3);
        assert_eq!(experience_bucket_index(60), 4);
        assert_eq!(experience_bucket_index(-4), 0);
    }

    #[test]
    fn test_location_first_seen_order_and_unknown() {
        let mut records = scenario();
        records[0].location = Some("Dock".to_string());
        records[1].location = None;

        assert_eq!(
            aggregate_by_location(&records),
            vec![
                DistributionBucket::new("Dock", 1),
                DistributionBucket::new("Unknown", 1),
                DistributionBucket::new("Main Plant", 1),
            ]
        );
    }

    #[test]
    fn test_missing_role_counts_as_unknown() {
        let mut records = scenario();
        records[2].role = None;

        assert_eq!(distinct_roles(&records), vec!["Worker", "Unknown"]);
        assert_eq!(summarize(&records).distinct_roles, 2);
        assert_eq!(
            filter(&records, &Selection::from("Unknown"), &Selection::All).len(),
            1
        );
    }

    #[test]
    fn test_distinct_statuses() {
        let mut records = scenario();
        records[1].status = None;
        assert_eq!(distinct_statuses(&records), vec!["Active", "Unknown"]);
    }

    #[test]
    fn test_average_rounds_half_up() {
        let records = vec![
            create_test_user("Worker", Status::Active, 2),
            create_test_user("Worker", Status::Active, 3),
        ];
        assert_eq!(summarize(&records).avg_experience_months, 3);

        let records = vec![
            create_test_user("Worker", Status::Active, -2),
            create_test_user("Worker", Status::Active, -3),
        ];
        assert_eq!(summarize(&records).avg_experience_months, -2);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(3, 0), 0.0);
    }
}
