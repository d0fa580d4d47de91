//! Roster report generation.
//!
//! Builds a [`Report`] from a snapshot and renders it as Markdown or JSON.

use crate::analysis::{
    aggregate_by_experience, aggregate_by_location, aggregate_by_role, distinct_roles,
    distinct_statuses, filter, percentage, summarize,
};
use crate::models::{
    DistributionBucket, Report, ReportMetadata, RosterSnapshot, RosterSummary, Selection,
};
use anyhow::Result;
use chrono::Utc;
use tracing::debug;

/// Filter the snapshot and compute every distribution.
///
/// Always recomputes from the unfiltered roster.
pub fn build_report(
    snapshot: &RosterSnapshot,
    role_filter: &Selection,
    status_filter: &Selection,
) -> Report {
    let filtered = filter(&snapshot.users, role_filter, status_filter);
    debug!(
        "Filter role={} status={} kept {} of {} users",
        role_filter,
        status_filter,
        filtered.len(),
        snapshot.users.len()
    );

    let metadata = ReportMetadata {
        source: snapshot.source.clone(),
        fetched_at: snapshot.fetched_at,
        generated_at: Utc::now(),
        role_filter: role_filter.clone(),
        status_filter: status_filter.clone(),
        records_total: snapshot.users.len(),
        records_matched: filtered.len(),
        available_roles: distinct_roles(&snapshot.users),
        available_statuses: distinct_statuses(&snapshot.users),
    };

    Report {
        metadata,
        summary: summarize(&filtered),
        by_role: aggregate_by_role(&filtered),
        by_experience: aggregate_by_experience(&filtered),
        by_location: aggregate_by_location(&filtered),
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, include_percentages: bool) -> String {
    let mut output = String::new();

    output.push_str("# Roster Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary));

    let total = report.summary.total;
    output.push_str(&generate_distribution_section(
        "Users by Role",
        "Role",
        &report.by_role,
        total,
        include_percentages,
    ));
    output.push_str(&generate_distribution_section(
        "Users by Experience",
        "Experience",
        &report.by_experience,
        total,
        include_percentages,
    ));
    output.push_str(&generate_distribution_section(
        "Users by Location",
        "Location",
        &report.by_location,
        total,
        include_percentages,
    ));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Fetched:** {}\n",
        metadata.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Role Filter:** {}\n", metadata.role_filter));
    section.push_str(&format!("- **Status Filter:** {}\n", metadata.status_filter));
    section.push_str(&format!(
        "- **Users Matched:** {} of {}\n",
        metadata.records_matched, metadata.records_total
    ));
    if !metadata.available_roles.is_empty() {
        section.push_str(&format!(
            "- **Available Roles:** {}\n",
            metadata.available_roles.join(", ")
        ));
    }
    if !metadata.available_statuses.is_empty() {
        section.push_str(&format!(
            "- **Available Statuses:** {}\n",
            metadata.available_statuses.join(", ")
        ));
    }
    section.push('\n');

    section
}

/// Generate the summary table.
fn generate_summary_section(summary: &RosterSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Users | Roles | Active | Avg. Experience (months) |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        summary.total, summary.distinct_roles, summary.active_count, summary.avg_experience_months
    ));

    section
}

/// Generate one distribution table.
fn generate_distribution_section(
    title: &str,
    column: &str,
    buckets: &[DistributionBucket],
    total: usize,
    include_percentages: bool,
) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if buckets.is_empty() {
        section.push_str("No users match the current filters.\n\n");
        return section;
    }

    if include_percentages {
        section.push_str(&format!("| {} | Users | Share |\n", column));
        section.push_str("|:---|:---:|:---:|\n");
        for bucket in buckets {
            section.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                bucket.label,
                bucket.count,
                percentage(bucket.count, total)
            ));
        }
    } else {
        section.push_str(&format!("| {} | Users |\n", column));
        section.push_str("|:---|:---:|\n");
        for bucket in buckets {
            section.push_str(&format!("| {} | {} |\n", bucket.label, bucket.count));
        }
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by RosterLens v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SnapshotSource, Status, UserRecord};

    fn create_test_user(id: &str, role: &str, status: Status, experience: i64) -> UserRecord {
        UserRecord {
            id: id.to_string(),
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

    fn create_test_snapshot() -> RosterSnapshot {
        RosterSnapshot::new(
            vec![
                create_test_user("1", "Worker", Status::Active, 3),
                create_test_user("2", "Worker", Status::Inactive, 30),
                create_test_user("3", "Manager", Status::Active, 70),
            ],
            None,
            SnapshotSource::Remote("http://factory.local/api/workers".to_string()),
        )
    }

    #[test]
    fn test_build_report_unfiltered() {
        let report = build_report(&create_test_snapshot(), &Selection::All, &Selection::All);

        assert_eq!(report.metadata.records_total, 3);
        assert_eq!(report.metadata.records_matched, 3);
        assert_eq!(report.metadata.available_roles, vec!["Worker", "Manager"]);
        assert_eq!(report.metadata.available_statuses, vec!["Active", "Inactive"]);
        assert_eq!(report.summary.avg_experience_months, 34);
        assert_eq!(report.by_role.len(), 2);
        assert_eq!(report.by_experience.len(), 5);
    }

    #[test]
    fn test_build_report_empty_match() {
        let report = build_report(
            &create_test_snapshot(),
            &Selection::from("Owner"),
            &Selection::All,
        );

        assert_eq!(report.metadata.records_matched, 0);
        assert_eq!(report.summary, RosterSummary::default());
        assert!(report.by_role.is_empty());
        assert!(report.by_location.is_empty());
        assert_eq!(report.by_experience.len(), 5);
        // Filter choices still come from the whole roster
        assert_eq!(report.metadata.available_roles.len(), 2);
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = build_report(&create_test_snapshot(), &Selection::All, &Selection::All);
        let markdown = generate_markdown_report(&report, true);

        assert!(markdown.contains("# Roster Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("API (http://factory.local/api/workers)"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("| 3 | 2 | 2 | 34 |"));
        assert!(markdown.contains("| Worker | 2 | 66.7% |"));
        assert!(markdown.contains("| 6-12 months | 0 | 0.0% |"));
        assert!(markdown.contains("## Users by Location"));
    }

    #[test]
    fn test_markdown_without_percentages() {
        let report = build_report(&create_test_snapshot(), &Selection::All, &Selection::All);
        let markdown = generate_markdown_report(&report, false);

        assert!(markdown.contains("| Worker | 2 |\n"));
        assert!(!markdown.contains('%'));
    }

    #[test]
    fn test_markdown_empty_match() {
        let report = build_report(
            &create_test_snapshot(),
            &Selection::All,
            &Selection::from("On Leave"),
        );
        let markdown = generate_markdown_report(&report, true);

        assert!(markdown.contains("No users match the current filters."));
        assert!(markdown.contains("| Less than 6 months | 0 | 0.0% |"));
        assert!(markdown.contains("- **Status Filter:** On Leave"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = build_report(
            &create_test_snapshot(),
            &Selection::from("Worker"),
            &Selection::All,
        );
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"role_filter\": \"Worker\""));
        assert!(json.contains("\"by_experience\""));
        assert!(json.contains("\"avg_experience_months\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total"], 2);
    }
}
