//! Backup policy schedules for a cloud backup service, and tracking of the
//! job sessions its asynchronous operations start.

pub mod calendar;
pub mod client;
pub mod config;
pub mod duration;
pub mod error;
pub mod health_check;
pub mod policy;
pub mod reconcile;
pub mod report;
pub mod retention;
pub mod schedule;
pub mod schema;
pub mod scope;
pub mod session;
pub mod tracker;

pub use client::{ApiClient, Method, RawResponse};
pub use config::{Config, Endpoints};
pub use error::{Error, Result};
pub use policy::{build, BackupPolicy, PolicyRequest};
pub use reconcile::{diff, ChangeSet, PolicyStore, UpdateOutcome};
pub use schedule::{ScheduleRule, Tier};
pub use session::{decode, OperationOutcome, OperationSession, SessionEnvelope};
pub use tracker::{Cancellation, PollPolicy, SessionTracker};
