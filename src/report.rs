use log::info;
use serde_json::Value;
use tabled::{Style, Table, Tabled};

use crate::policy::BackupPolicy;
use crate::reconcile::{Change, ChangeKind, ChangeSet};
use crate::schedule::ScheduleRule;
use crate::session::{OperationOutcome, OperationSession};

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn hours(hours: Option<&Vec<u8>>) -> String {
    match hours {
        Some(hours) => hours
            .iter()
            .map(|h| format!("{:02}:00", h))
            .collect::<Vec<_>>()
            .join(" "),
        None => "-".to_string(),
    }
}

#[derive(Tabled)]
pub struct TierRow {
    pub tier: String,
    pub trigger: String,
    pub snapshots: String,
    pub keep: String,
    pub backups: String,
    pub retention: String,
    pub repository: String,
}

impl TierRow {
    pub fn new(rule: &ScheduleRule) -> Self {
        let snapshot = rule.snapshot_schedule();
        let backup = rule.backup_schedule();
        Self {
            tier: rule.tier().declared_key().to_string(),
            trigger: rule.trigger_summary(),
            snapshots: snapshot.map_or_else(|| "off".to_string(), |s| hours(s.hours.as_ref())),
            keep: or_dash(snapshot.and_then(|s| s.snapshots_to_keep)),
            backups: backup.map_or_else(|| "off".to_string(), |b| hours(b.hours.as_ref())),
            retention: or_dash(backup.and_then(|b| b.retention.as_ref())),
            repository: or_dash(backup.and_then(|b| b.target_repository_id.as_deref())),
        }
    }

    pub fn print_tabled(policy: &BackupPolicy) {
        let rows = policy.schedules.iter().map(Self::new).collect::<Vec<_>>();
        if rows.is_empty() {
            info!("policy '{}' has no enabled schedule", policy.name);
            return;
        }
        let table = Table::new(rows).with(Style::modern()).to_string();
        info!("policy '{}'\n{}", policy.name, table);
    }
}

#[derive(Tabled)]
pub struct ChangeRow {
    #[tabled(display_with("Self::display_kind", args))]
    pub kind: ChangeKind,
    pub path: String,
    pub old: String,
    pub new: String,
}

fn compact(value: Option<&Value>) -> String {
    match value {
        None => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

impl ChangeRow {
    pub fn new(change: &Change) -> Self {
        Self {
            kind: change.kind(),
            path: change.path.clone(),
            old: compact(change.old.as_ref()),
            new: compact(change.new.as_ref()),
        }
    }

    fn display_kind(&self) -> String {
        match self.kind {
            ChangeKind::Added => "++++++".to_string(),
            ChangeKind::Removed => "------".to_string(),
            ChangeKind::Modified => "~~~~~~".to_string(),
        }
    }

    pub fn print_tabled(changes: &ChangeSet) {
        if changes.is_empty() {
            info!("no changes");
            return;
        }
        let rows = changes.changes.iter().map(Self::new).collect::<Vec<_>>();
        let table = Table::new(rows).with(Style::modern()).to_string();
        info!("{}", table);
    }
}

#[derive(Tabled)]
pub struct SessionRow {
    pub id: String,
    #[tabled(rename = "type")]
    pub session_type: String,
    pub status: String,
    pub elapsed: String,
    pub outcome: String,
}

impl SessionRow {
    pub fn new(session: &OperationSession, outcome: &OperationOutcome) -> Self {
        Self {
            id: session.id.clone(),
            session_type: session.session_type.clone(),
            status: session.status.to_string(),
            elapsed: or_dash(session.elapsed().map(|d| format!("{}s", d.num_seconds()))),
            outcome: outcome.summary(),
        }
    }

    pub fn print_tabled(rows: &[Self]) {
        let table = Table::new(rows).with(Style::modern()).to_string();
        info!("{}", table);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tier_row_columns() {
        let policy = BackupPolicy::from_declared(&json!({
            "name": "p",
            "monthly_schedule": {
                "type": "Last",
                "day_of_week": "Friday",
                "snapshot_schedule": {"hours": [2, 14], "snapshots_to_keep": 3},
                "backup_schedule": {
                    "retention": {"time_retention_duration": 12, "retention_duration_type": "Months"},
                    "target_repository_id": "repo-1"
                }
            }
        }))
        .unwrap();

        let row = TierRow::new(&policy.schedules[0]);
        assert_eq!(row.tier, "monthly_schedule");
        assert_eq!(row.snapshots, "02:00 14:00");
        assert_eq!(row.keep, "3");
        assert_eq!(row.backups, "-");
        assert_eq!(row.repository, "repo-1");
        assert_ne!(row.retention, "-");
    }

    #[test]
    fn change_row_symbols() {
        let change = Change {
            path: "description".to_string(),
            old: None,
            new: Some(json!("nightly")),
        };
        let row = ChangeRow::new(&change);
        assert_eq!(row.kind, ChangeKind::Added);
        assert_eq!(row.display_kind(), "++++++");
        assert_eq!(row.old, "-");
        assert_eq!(row.new, "nightly");
    }
}
