//! CSV export of a filtered roster.
//!
//! Fields are written as-is with no quoting; roster values are assumed
//! to be comma-free.

use crate::models::UserRecord;
use anyhow::{Context, Result};
use std::path::Path;

/// Column header, in output order.
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "First Name",
    "Last Name",
    "Role",
    "Email",
    "Location",
    "Join Date",
    "Status",
    "Experience (months)",
];

/// Render records as CSV text, one row per record in input order.
pub fn export_csv(records: &[UserRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for record in records {
        let row = [
            record.id.clone(),
            record.first_name.clone(),
            record.last_name.clone(),
            record.role_label().to_string(),
            record.email.clone(),
            record.location_label().to_string(),
            record
                .join_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            record.status_display_label(),
            record.experience_months.to_string(),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Write the CSV export to a file.
pub fn write_csv(records: &[UserRecord], path: &Path) -> Result<()> {
    std::fs::write(path, export_csv(records))
        .with_context(|| format!("Failed to write CSV to {}", path.display()))
}
