//! Job session envelopes and their decoding.
//!
//! The service reports every asynchronous job through one envelope with a
//! `type` discriminator and one payload object per job family. The
//! discriminator is authoritative: a payload is read only from the field the
//! type names, whatever else the server happened to fill in.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, FixedOffset};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Open-ended session status. Only a few values are known to be terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Success,
    Failed,
    Warning,
    Other(String),
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Success => "Success",
            SessionStatus::Failed => "Failed",
            SessionStatus::Warning => "Warning",
            SessionStatus::Other(s) => s,
        }
    }
}

impl From<&str> for SessionStatus {
    fn from(s: &str) -> Self {
        match s {
            "Success" => SessionStatus::Success,
            "Failed" => SessionStatus::Failed,
            "Warning" => SessionStatus::Warning,
            other => SessionStatus::Other(other.to_string()),
        }
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Backup,
    HealthCheck,
    Restore,
    FileLevelRestore,
    FileShareFileLevelRestore,
    Repository,
    RestorePointDataRetrieval,
    Retention,
}

impl SessionKind {
    /// Maps the envelope `type` to the payload family it carries.
    pub fn from_type(session_type: &str) -> Option<Self> {
        Some(match session_type {
            "BackupJob" | "PolicyBackup" | "PolicySnapshot" | "PolicyArchive" | "ManualBackup"
            | "ManualSnapshot" => SessionKind::Backup,
            "HealthCheckJob" => SessionKind::HealthCheck,
            "RestoreJob" => SessionKind::Restore,
            "FileLevelRestoreJob" => SessionKind::FileLevelRestore,
            "FileShareFileLevelRestoreJob" => SessionKind::FileShareFileLevelRestore,
            "RepositoryJob" => SessionKind::Repository,
            "RestorePointDataRetrievalJob" => SessionKind::RestorePointDataRetrieval,
            "RetentionJob" => SessionKind::Retention,
            _ => return None,
        })
    }

    pub fn payload_field(self) -> &'static str {
        match self {
            SessionKind::Backup => "backupJobInfo",
            SessionKind::HealthCheck => "healthCheckJobInfo",
            SessionKind::Restore => "restoreJobInfo",
            SessionKind::FileLevelRestore => "fileLevelRestoreJobInfo",
            SessionKind::FileShareFileLevelRestore => "fileShareFileLevelRestoreJobInfo",
            SessionKind::Repository => "repositoryJobInfo",
            SessionKind::RestorePointDataRetrieval => "restorePointDataRetrievalJobInfo",
            SessionKind::Retention => "retentionJobInfo",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupJobInfo {
    pub policy_id: Option<String>,
    pub policy_name: Option<String>,
    pub protected_instances_count: Option<u64>,
    pub failed_instances_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthCheckJobInfo {
    pub policy_id: Option<String>,
    pub policy_name: Option<String>,
    pub checked_restore_points_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestoreJobInfo {
    pub restore_point_id: Option<String>,
    pub item_name: Option<String>,
    pub reason: Option<String>,
    pub to_alternative_location: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileLevelRestoreJobInfo {
    pub restore_point_id: Option<String>,
    pub vm_name: Option<String>,
    pub initiator: Option<String>,
    pub reason: Option<String>,
    pub fllr_link: Option<String>,
    pub expiration_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileShareFileLevelRestoreJobInfo {
    pub restore_point_id: Option<String>,
    pub file_share_name: Option<String>,
    pub initiator: Option<String>,
    pub reason: Option<String>,
    pub fllr_link: Option<String>,
    pub expiration_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryJobInfo {
    pub repository_id: Option<String>,
    pub repository_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestorePointDataRetrievalJobInfo {
    pub restore_point_id: Option<String>,
    pub item_name: Option<String>,
    pub retrieval_type: Option<String>,
    pub expiration_date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetentionJobInfo {
    pub retained_restore_points_count: Option<u64>,
    pub deleted_restore_points_count: Option<u64>,
}

/// The session document exactly as the service sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionEnvelope {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub status: Option<String>,
    pub execution_start_time: Option<DateTime<FixedOffset>>,
    pub execution_stop_time: Option<DateTime<FixedOffset>>,
    pub execution_duration: Option<String>,
    pub backup_job_info: Option<BackupJobInfo>,
    pub health_check_job_info: Option<HealthCheckJobInfo>,
    pub restore_job_info: Option<RestoreJobInfo>,
    pub file_level_restore_job_info: Option<FileLevelRestoreJobInfo>,
    pub file_share_file_level_restore_job_info: Option<FileShareFileLevelRestoreJobInfo>,
    pub repository_job_info: Option<RepositoryJobInfo>,
    pub restore_point_data_retrieval_job_info: Option<RestorePointDataRetrievalJobInfo>,
    pub retention_job_info: Option<RetentionJobInfo>,
}

impl SessionEnvelope {
    pub fn session_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::protocol("session without id"))
    }

    pub fn session_status(&self) -> Result<SessionStatus> {
        self.status
            .as_deref()
            .map(SessionStatus::from)
            .ok_or_else(|| Error::protocol(format!("session {:?} without status", self.id)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPayload {
    Backup(BackupJobInfo),
    HealthCheck(HealthCheckJobInfo),
    Restore(RestoreJobInfo),
    FileLevelRestore(FileLevelRestoreJobInfo),
    FileShareFileLevelRestore(FileShareFileLevelRestoreJobInfo),
    Repository(RepositoryJobInfo),
    RestorePointDataRetrieval(RestorePointDataRetrievalJobInfo),
    Retention(RetentionJobInfo),
}

impl SessionPayload {
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionPayload::Backup(_) => SessionKind::Backup,
            SessionPayload::HealthCheck(_) => SessionKind::HealthCheck,
            SessionPayload::Restore(_) => SessionKind::Restore,
            SessionPayload::FileLevelRestore(_) => SessionKind::FileLevelRestore,
            SessionPayload::FileShareFileLevelRestore(_) => SessionKind::FileShareFileLevelRestore,
            SessionPayload::Repository(_) => SessionKind::Repository,
            SessionPayload::RestorePointDataRetrieval(_) => SessionKind::RestorePointDataRetrieval,
            SessionPayload::Retention(_) => SessionKind::Retention,
        }
    }
}

/// A job session with its payload resolved by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSession {
    pub id: String,
    pub session_type: String,
    pub status: SessionStatus,
    pub execution_start: Option<DateTime<FixedOffset>>,
    pub execution_stop: Option<DateTime<FixedOffset>>,
    pub execution_duration: Option<String>,
    pub payload: SessionPayload,
}

fn required<T>(payload: Option<T>, id: &str, session_type: &str, kind: SessionKind) -> Result<T> {
    payload.ok_or_else(|| {
        Error::protocol(format!(
            "session {} of type {} carries no {}",
            id,
            session_type,
            kind.payload_field()
        ))
    })
}

impl TryFrom<SessionEnvelope> for OperationSession {
    type Error = Error;

    fn try_from(envelope: SessionEnvelope) -> Result<Self> {
        let id = envelope.session_id()?.to_string();
        let status = envelope.session_status()?;
        let session_type = envelope
            .session_type
            .clone()
            .ok_or_else(|| Error::protocol(format!("session {} without type", id)))?;
        let kind = SessionKind::from_type(&session_type).ok_or_else(|| {
            Error::protocol(format!(
                "session {} has unrecognized type '{}'",
                id, session_type
            ))
        })?;

        let t = session_type.as_str();
        let payload = match kind {
            SessionKind::Backup => {
                SessionPayload::Backup(required(envelope.backup_job_info, &id, t, kind)?)
            }
            SessionKind::HealthCheck => SessionPayload::HealthCheck(required(
                envelope.health_check_job_info,
                &id,
                t,
                kind,
            )?),
            SessionKind::Restore => {
                SessionPayload::Restore(required(envelope.restore_job_info, &id, t, kind)?)
            }
            SessionKind::FileLevelRestore => SessionPayload::FileLevelRestore(required(
                envelope.file_level_restore_job_info,
                &id,
                t,
                kind,
            )?),
            SessionKind::FileShareFileLevelRestore => SessionPayload::FileShareFileLevelRestore(
                required(envelope.file_share_file_level_restore_job_info, &id, t, kind)?,
            ),
            SessionKind::Repository => {
                SessionPayload::Repository(required(envelope.repository_job_info, &id, t, kind)?)
            }
            SessionKind::RestorePointDataRetrieval => SessionPayload::RestorePointDataRetrieval(
                required(envelope.restore_point_data_retrieval_job_info, &id, t, kind)?,
            ),
            SessionKind::Retention => {
                SessionPayload::Retention(required(envelope.retention_job_info, &id, t, kind)?)
            }
        };

        Ok(Self {
            id,
            session_type,
            status,
            execution_start: envelope.execution_start_time,
            execution_stop: envelope.execution_stop_time,
            execution_duration: envelope.execution_duration,
            payload,
        })
    }
}

impl OperationSession {
    pub fn kind(&self) -> SessionKind {
        self.payload.kind()
    }

    /// Wall time between start and stop, when both are known.
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.execution_start, self.execution_stop) {
            (Some(start), Some(stop)) => Some(stop - start),
            _ => None,
        }
    }
}

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    RepositoryCreated { id: String },
    Backup(BackupJobInfo),
    HealthCheck(HealthCheckJobInfo),
    Restore(RestoreJobInfo),
    FileLevelRestore(FileLevelRestoreJobInfo),
    FileShareFileLevelRestore(FileShareFileLevelRestoreJobInfo),
    RestorePointDataRetrieval(RestorePointDataRetrievalJobInfo),
    Retention(RetentionJobInfo),
    Failed {
        session_id: String,
        kind: SessionKind,
        detail: Option<String>,
    },
}

impl OperationOutcome {
    pub fn summary(&self) -> String {
        match self {
            OperationOutcome::RepositoryCreated { id } => format!("repository {} created", id),
            OperationOutcome::Backup(info) => format!(
                "backup of policy {} protected {} instance(s)",
                info.policy_name.as_deref().unwrap_or("?"),
                info.protected_instances_count.unwrap_or(0)
            ),
            OperationOutcome::HealthCheck(info) => format!(
                "health check of policy {} done",
                info.policy_name.as_deref().unwrap_or("?")
            ),
            OperationOutcome::Restore(info) => format!(
                "restored {}",
                info.item_name.as_deref().unwrap_or("item")
            ),
            OperationOutcome::FileLevelRestore(info) => format!(
                "file-level restore session for {} at {}",
                info.vm_name.as_deref().unwrap_or("?"),
                info.fllr_link.as_deref().unwrap_or("-")
            ),
            OperationOutcome::FileShareFileLevelRestore(info) => format!(
                "file-share restore session for {} at {}",
                info.file_share_name.as_deref().unwrap_or("?"),
                info.fllr_link.as_deref().unwrap_or("-")
            ),
            OperationOutcome::RestorePointDataRetrieval(info) => format!(
                "data of restore point {} retrieved",
                info.restore_point_id.as_deref().unwrap_or("?")
            ),
            OperationOutcome::Retention(info) => format!(
                "retention removed {} restore point(s)",
                info.deleted_restore_points_count.unwrap_or(0)
            ),
            OperationOutcome::Failed {
                session_id,
                kind,
                detail,
            } => format!(
                "session {} ({}) failed: {}",
                session_id,
                kind.payload_field(),
                detail.as_deref().unwrap_or("no detail")
            ),
        }
    }
}

fn failure_detail(payload: &SessionPayload) -> Option<String> {
    match payload {
        SessionPayload::Restore(info) => info.reason.clone(),
        SessionPayload::FileLevelRestore(info) => info.reason.clone(),
        SessionPayload::FileShareFileLevelRestore(info) => info.reason.clone(),
        _ => None,
    }
}

/// Extracts the type-specific outcome of a terminal session.
pub fn decode(session: &OperationSession) -> Result<OperationOutcome> {
    match session.status {
        SessionStatus::Failed => {
            return Ok(OperationOutcome::Failed {
                session_id: session.id.clone(),
                kind: session.kind(),
                detail: failure_detail(&session.payload),
            })
        }
        SessionStatus::Warning => warn!(
            "session {} ({}) finished with warnings",
            session.id, session.session_type
        ),
        SessionStatus::Success => info!("session {} ({}) succeeded", session.id, session.session_type),
        SessionStatus::Other(ref status) => {
            return Err(Error::protocol(format!(
                "session {} is not finished (status '{}')",
                session.id, status
            )))
        }
    }

    Ok(match &session.payload {
        SessionPayload::Repository(info) => match info.repository_id.as_deref() {
            Some(id) if !id.is_empty() => OperationOutcome::RepositoryCreated { id: id.to_string() },
            _ => {
                return Err(Error::MissingIdentity {
                    session_id: session.id.clone(),
                })
            }
        },
        SessionPayload::Backup(info) => OperationOutcome::Backup(info.clone()),
        SessionPayload::HealthCheck(info) => OperationOutcome::HealthCheck(info.clone()),
        SessionPayload::Restore(info) => OperationOutcome::Restore(info.clone()),
        SessionPayload::FileLevelRestore(info) => OperationOutcome::FileLevelRestore(info.clone()),
        SessionPayload::FileShareFileLevelRestore(info) => {
            OperationOutcome::FileShareFileLevelRestore(info.clone())
        }
        SessionPayload::RestorePointDataRetrieval(info) => {
            OperationOutcome::RestorePointDataRetrieval(info.clone())
        }
        SessionPayload::Retention(info) => OperationOutcome::Retention(info.clone()),
    })
}

/// Convenience for raw envelopes: resolve the payload, then decode.
pub fn decode_envelope(envelope: SessionEnvelope) -> Result<OperationOutcome> {
    decode(&OperationSession::try_from(envelope)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(value: serde_json::Value) -> SessionEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn repository_session_yields_identity() {
        let outcome = decode_envelope(envelope(json!({
            "id": "s-1",
            "type": "RepositoryJob",
            "status": "Success",
            "repositoryJobInfo": {"repositoryId": "r-1", "repositoryName": "main"}
        })))
        .unwrap();
        assert_eq!(
            outcome,
            OperationOutcome::RepositoryCreated {
                id: "r-1".to_string()
            }
        );
    }

    #[test]
    fn missing_payload_is_a_protocol_error() {
        let err = decode_envelope(envelope(json!({
            "id": "s-1",
            "type": "RepositoryJob",
            "status": "Success",
            "repositoryJobInfo": null
        })))
        .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)), "{}", err);
    }

    #[test]
    fn discriminator_wins_over_populated_fields() {
        let err = decode_envelope(envelope(json!({
            "id": "s-2",
            "type": "RestoreJob",
            "status": "Success",
            "repositoryJobInfo": {"repositoryId": "r-1"}
        })))
        .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        let outcome = decode_envelope(envelope(json!({
            "id": "s-2",
            "type": "RestoreJob",
            "status": "Success",
            "repositoryJobInfo": {"repositoryId": "r-1"},
            "restoreJobInfo": {"itemName": "vm-1", "restorePointId": "rp-1"}
        })))
        .unwrap();
        assert!(matches!(outcome, OperationOutcome::Restore(ref info) if info.item_name.as_deref() == Some("vm-1")));
    }

    #[test]
    fn successful_repository_session_without_id() {
        for info in [json!({}), json!({"repositoryId": ""})] {
            let err = decode_envelope(envelope(json!({
                "id": "s-3",
                "type": "RepositoryJob",
                "status": "Success",
                "repositoryJobInfo": info
            })))
            .unwrap_err();
            assert!(matches!(err, Error::MissingIdentity { ref session_id } if session_id == "s-3"));
        }
    }

    #[test]
    fn failed_session_reports_detail() {
        let outcome = decode_envelope(envelope(json!({
            "id": "s-4",
            "type": "RestoreJob",
            "status": "Failed",
            "restoreJobInfo": {"reason": "disk quota exceeded"}
        })))
        .unwrap();
        assert_eq!(
            outcome,
            OperationOutcome::Failed {
                session_id: "s-4".to_string(),
                kind: SessionKind::Restore,
                detail: Some("disk quota exceeded".to_string()),
            }
        );
    }

    #[test]
    fn envelope_must_be_complete() {
        let cases = [
            json!({"type": "RetentionJob", "status": "Success", "retentionJobInfo": {}}),
            json!({"id": "s", "status": "Success", "retentionJobInfo": {}}),
            json!({"id": "s", "type": "RetentionJob", "retentionJobInfo": {}}),
            json!({"id": "s", "type": "TeleportJob", "status": "Success"}),
        ];
        for case in cases {
            let err = OperationSession::try_from(envelope(case.clone())).unwrap_err();
            assert!(matches!(err, Error::Protocol(_)), "{}", case);
        }
    }

    #[test]
    fn running_session_cannot_be_decoded() {
        let session = OperationSession::try_from(envelope(json!({
            "id": "s", "type": "RetentionJob", "status": "Running", "retentionJobInfo": {}
        })))
        .unwrap();
        assert!(!session.status.is_terminal());
        assert!(matches!(decode(&session), Err(Error::Protocol(_))));
    }

    #[test]
    fn timestamps_and_elapsed() {
        let session = OperationSession::try_from(envelope(json!({
            "id": "s",
            "type": "PolicyBackup",
            "status": "Warning",
            "executionStartTime": "2024-03-01T10:00:00+01:00",
            "executionStopTime": "2024-03-01T10:05:30+01:00",
            "executionDuration": "00:05:30",
            "backupJobInfo": {"policyName": "prod", "protectedInstancesCount": 4}
        })))
        .unwrap();
        assert_eq!(session.kind(), SessionKind::Backup);
        assert_eq!(session.elapsed(), Some(Duration::seconds(330)));
        let outcome = decode(&session).unwrap();
        assert_eq!(outcome.summary(), "backup of policy prod protected 4 instance(s)");
    }

    #[test]
    fn unknown_status_is_pass_through() {
        let status = SessionStatus::from("Canceling");
        assert!(!status.is_terminal());
        assert_eq!(status.to_string(), "Canceling");
        assert!(SessionStatus::from("Warning").is_terminal());
    }
}
