//! Submission of asynchronous operations and the poll loop that waits for
//! their job sessions.
//!
//! Every long-running mutation answers with a job session. The tracker
//! submits the request, polls the session with exponential backoff until its
//! status is terminal, and hands the resolved session to
//! [`decode`](crate::session::decode). The clock is injectable so the loop
//! can be driven without real time passing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{expect_accepted, expect_found, ApiClient, Method};
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::policy::{BackupPolicy, PolicyRequest};
use crate::session::{
    decode, OperationOutcome, OperationSession, RestoreJobInfo, SessionEnvelope, SessionStatus,
};

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Shared flag checked by [`SessionTracker::wait`] between polls.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_interval: Duration,
    pub backoff_multiplier: f64,
    /// Overall limit, measured from the first poll.
    pub timeout: Duration,
    /// Gives up early when the status does not change for this long.
    pub stall_timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            timeout: Duration::from_secs(30 * 60),
            stall_timeout: None,
        }
    }
}

impl PollPolicy {
    /// Grows `current` by the multiplier, capped at `max_interval`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let next = current.as_secs_f64() * self.backoff_multiplier.max(1.0);
        Duration::from_secs_f64(next.min(self.max_interval.as_secs_f64()))
    }
}

/// A mutating request whose answer is a job session.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    /// Status codes the endpoint documents as success.
    pub accepted: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "azureStorageAccountId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_account_id: Option<String>,
    #[serde(
        rename = "azureStorageContainer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_container: Option<String>,
    #[serde(
        rename = "azureStorageFolder",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_encryption: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutability_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreVmRequest {
    pub to_alternative_location: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_vm_after_restore: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestoredItem {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub item_type: Option<String>,
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestoredItemsPage {
    results: Vec<RestoredItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreResult {
    pub session_id: String,
    pub status: SessionStatus,
    pub info: RestoreJobInfo,
    pub restored_items: Vec<RestoredItem>,
}

pub struct SessionTracker<'a, C: ?Sized> {
    client: &'a C,
    endpoints: Endpoints,
    clock: Box<dyn Clock + 'a>,
}

impl<'a, C: ApiClient + ?Sized> SessionTracker<'a, C> {
    pub fn new(client: &'a C, endpoints: Endpoints) -> Self {
        Self {
            client,
            endpoints,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Sends the request and returns the handle of the session it started.
    pub fn submit(&self, submission: &Submission) -> Result<SessionHandle> {
        info!("{} {}", submission.method, submission.path);
        let response = self.client.request(
            submission.method,
            &submission.path,
            submission.body.as_ref(),
        )?;
        let response = expect_accepted(response, &submission.accepted)?;
        let envelope: SessionEnvelope = response.json()?;
        let id = envelope.session_id()?.to_string();
        debug!("{} {} started session {}", submission.method, submission.path, id);
        Ok(SessionHandle { id })
    }

    pub fn poll(&self, handle: &SessionHandle) -> Result<SessionEnvelope> {
        let path = self.endpoints.session(&handle.id);
        let response = self.client.request(Method::Get, &path, None)?;
        expect_found(response, &path)?.json()
    }

    /// Polls until the session reaches a terminal status.
    pub fn wait(
        &self,
        handle: &SessionHandle,
        policy: &PollPolicy,
        cancellation: &Cancellation,
    ) -> Result<OperationSession> {
        let started = self.clock.now();
        let mut interval = policy.interval;
        let mut last_status: Option<SessionStatus> = None;
        let mut last_change = started;

        loop {
            if cancellation.is_cancelled() {
                return Err(Error::Cancelled {
                    session_id: handle.id.clone(),
                });
            }

            let envelope = self.poll(handle)?;
            let status = envelope.session_status()?;
            let now = self.clock.now();
            let elapsed = now.duration_since(started);
            trace!("session {} is '{}' after {:?}", handle.id, status, elapsed);

            if status.is_terminal() {
                let session = OperationSession::try_from(envelope)?;
                info!(
                    "session {} ({}) finished with status '{}'",
                    session.id, session.session_type, session.status
                );
                return Ok(session);
            }

            if last_status.as_ref() != Some(&status) {
                last_change = now;
                last_status = Some(status.clone());
            }

            let timeout = |elapsed| Error::Timeout {
                session_id: handle.id.clone(),
                status: status.to_string(),
                elapsed,
            };
            if elapsed >= policy.timeout {
                return Err(timeout(elapsed));
            }
            if let Some(stall) = policy.stall_timeout {
                if now.duration_since(last_change) >= stall {
                    debug!("session {} stalled in '{}'", handle.id, status);
                    return Err(timeout(elapsed));
                }
            }

            self.clock.sleep(interval.min(policy.timeout - elapsed));
            interval = policy.next_interval(interval);
        }
    }

    fn finished(
        &self,
        submission: &Submission,
        policy: &PollPolicy,
        cancellation: &Cancellation,
    ) -> Result<(OperationSession, OperationOutcome)> {
        let handle = self.submit(submission)?;
        let session = self.wait(&handle, policy, cancellation)?;
        let outcome = decode(&session)?;
        if let OperationOutcome::Failed { .. } = outcome {
            return Err(Error::SessionFailed {
                session_id: session.id,
                status: session.status.to_string(),
            });
        }
        Ok((session, outcome))
    }

    /// Creates a repository and returns its id once the job has finished.
    pub fn create_repository(
        &self,
        request: &RepositoryRequest,
        policy: &PollPolicy,
        cancellation: &Cancellation,
    ) -> Result<String> {
        let submission = Submission {
            method: Method::Post,
            path: self.endpoints.repositories(),
            body: Some(serde_json::to_value(request).map_err(|e| Error::protocol(e.to_string()))?),
            accepted: vec![201, 202],
        };
        match self.finished(&submission, policy, cancellation)? {
            (_, OperationOutcome::RepositoryCreated { id }) => {
                info!("repository '{}' created with id {}", request.name, id);
                Ok(id)
            }
            (session, outcome) => Err(Error::protocol(format!(
                "repository creation reported by session {} as: {}",
                session.id,
                outcome.summary()
            ))),
        }
    }

    /// Restores a virtual machine from a restore point.
    pub fn restore_vm(
        &self,
        restore_point_id: &str,
        request: &RestoreVmRequest,
        policy: &PollPolicy,
        cancellation: &Cancellation,
    ) -> Result<RestoreResult> {
        let submission = Submission {
            method: Method::Post,
            path: self.endpoints.restore_vm(restore_point_id),
            body: Some(serde_json::to_value(request).map_err(|e| Error::protocol(e.to_string()))?),
            accepted: vec![202, 201],
        };
        match self.finished(&submission, policy, cancellation)? {
            (session, OperationOutcome::Restore(info)) => Ok(RestoreResult {
                restored_items: self.restored_items(&session.id)?,
                session_id: session.id,
                status: session.status,
                info,
            }),
            (session, outcome) => Err(Error::protocol(format!(
                "restore of {} reported by session {} as: {}",
                restore_point_id,
                session.id,
                outcome.summary()
            ))),
        }
    }

    /// First page of the items a restore session produced.
    pub fn restored_items(&self, session_id: &str) -> Result<Vec<RestoredItem>> {
        let path = self.endpoints.restored_items(session_id);
        let response = self.client.request(Method::Get, &path, None)?;
        let page: RestoredItemsPage = expect_found(response, &path)?.json()?;
        Ok(page.results)
    }

    /// Creates or updates a policy; returns the document the service echoed, if any.
    pub fn send_policy(&self, request: &PolicyRequest) -> Result<Option<Value>> {
        let (method, path) = request.route(&self.endpoints);
        let accepted: &[u16] = if request.is_update() {
            &[200, 204]
        } else {
            &[201, 200]
        };
        info!("{} {} for policy '{}'", method, path, request.policy.name);

        let response = self.client.request(method, &path, Some(&request.body))?;
        let response = expect_accepted(response, accepted)?;
        if !response.has_body() {
            return Ok(None);
        }
        response.json().map(Some)
    }

    /// Like [`send_policy`](Self::send_policy), with the echo parsed.
    pub fn apply_policy(&self, request: &PolicyRequest) -> Result<Option<BackupPolicy>> {
        self.send_policy(request)?
            .map(|echoed| BackupPolicy::from_remote(&echoed))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use serde_json::json;

    use super::*;
    use crate::client::RawResponse;
    use crate::policy::build;

    struct ManualClock {
        start: Instant,
        offset: Cell<Duration>,
        sleeps: RefCell<Vec<Duration>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                offset: Cell::new(Duration::ZERO),
                sleeps: RefCell::new(Vec::new()),
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + self.offset.get()
        }

        fn sleep(&self, duration: Duration) {
            self.offset.set(self.offset.get() + duration);
            self.sleeps.borrow_mut().push(duration);
        }
    }

    fn session(status: &str) -> String {
        json!({
            "id": "s-1",
            "type": "RepositoryJob",
            "status": status,
            "repositoryJobInfo": {"repositoryId": "r-1"}
        })
        .to_string()
    }

    fn secs(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|s| Duration::from_secs(*s)).collect()
    }

    fn policy() -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            timeout: Duration::from_secs(30),
            stall_timeout: None,
        }
    }

    fn handle() -> SessionHandle {
        SessionHandle {
            id: "s-1".to_string(),
        }
    }

    #[test]
    fn running_session_times_out() {
        let polls = Cell::new(0);
        let client = |_: Method, path: &str, _: Option<&Value>| -> Result<RawResponse> {
            assert_eq!(path, "/api/v6/jobSessions/s-1");
            polls.set(polls.get() + 1);
            Ok(RawResponse::new(200, session("Running")))
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);

        let err = tracker
            .wait(&handle(), &policy(), &Cancellation::new())
            .unwrap_err();
        match err {
            Error::Timeout {
                session_id,
                status,
                elapsed,
            } => {
                assert_eq!(session_id, "s-1");
                assert_eq!(status, "Running");
                assert_eq!(elapsed, Duration::from_secs(30));
            }
            other => panic!("unexpected {}", other),
        }
        assert_eq!(polls.get(), 4);
        assert_eq!(*clock.sleeps.borrow(), secs(&[5, 10, 15]));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = PollPolicy {
            interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(4),
            backoff_multiplier: 3.0,
            ..PollPolicy::default()
        };
        let polls = Cell::new(0);
        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            polls.set(polls.get() + 1);
            let status = if polls.get() < 5 { "Running" } else { "Success" };
            Ok(RawResponse::new(200, session(status)))
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);

        let session = tracker
            .wait(&handle(), &policy, &Cancellation::new())
            .unwrap();
        assert_eq!(session.status, SessionStatus::Success);
        assert_eq!(*clock.sleeps.borrow(), secs(&[1, 3, 4, 4]));
    }

    #[test]
    fn huge_multiplier_stays_at_the_cap() {
        for multiplier in [1e20, f64::INFINITY, f64::MAX] {
            let policy = PollPolicy {
                backoff_multiplier: multiplier,
                ..policy()
            };
            assert_eq!(
                policy.next_interval(Duration::from_secs(5)),
                Duration::from_secs(60),
                "{}",
                multiplier
            );
        }

        let policy = PollPolicy {
            backoff_multiplier: 1e20,
            ..policy()
        };
        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            Ok(RawResponse::new(200, session("Running")))
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);
        let err = tracker
            .wait(&handle(), &policy, &Cancellation::new())
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
        assert_eq!(*clock.sleeps.borrow(), secs(&[5, 25]));
    }

    #[test]
    fn stalled_status_gives_up_early() {
        let policy = PollPolicy {
            stall_timeout: Some(Duration::from_secs(12)),
            timeout: Duration::from_secs(600),
            ..policy()
        };
        let polls = Cell::new(0);
        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            polls.set(polls.get() + 1);
            let status = if polls.get() == 1 { "Queued" } else { "Running" };
            Ok(RawResponse::new(200, session(status)))
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);

        // Queued at 0, Running from 5, still Running at 15 and 35.
        let err = tracker
            .wait(&handle(), &policy, &Cancellation::new())
            .unwrap_err();
        assert!(
            matches!(err, Error::Timeout { elapsed, .. } if elapsed == Duration::from_secs(35)),
            "{}",
            err
        );
    }

    #[test]
    fn cancellation_stops_the_loop() {
        let cancellation = Cancellation::new();
        let polls = Cell::new(0);
        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            polls.set(polls.get() + 1);
            if polls.get() == 2 {
                cancellation.cancel();
            }
            Ok(RawResponse::new(200, session("Running")))
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);

        let err = tracker.wait(&handle(), &policy(), &cancellation).unwrap_err();
        assert!(matches!(err, Error::Cancelled { ref session_id } if session_id == "s-1"));
        assert_eq!(polls.get(), 2);
    }

    #[test]
    fn missing_session_is_not_found() {
        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            Ok(RawResponse::new(404, ""))
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);
        let err = tracker
            .wait(&handle(), &policy(), &Cancellation::new())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn create_repository_returns_identity() {
        let calls = RefCell::new(Vec::new());
        let client = |method: Method, path: &str, body: Option<&Value>| -> Result<RawResponse> {
            calls.borrow_mut().push((method, path.to_string()));
            match method {
                Method::Post => {
                    assert_eq!(body.unwrap()["azureStorageAccountId"], "sa-1");
                    Ok(RawResponse::new(202, session("Running")))
                }
                _ => Ok(RawResponse::new(200, session("Success"))),
            }
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);
        let request = RepositoryRequest {
            name: "main".to_string(),
            storage_account_id: Some("sa-1".to_string()),
            ..RepositoryRequest::default()
        };

        let id = tracker
            .create_repository(&request, &policy(), &Cancellation::new())
            .unwrap();
        assert_eq!(id, "r-1");
        assert_eq!(
            *calls.borrow(),
            vec![
                (Method::Post, "/api/v6/repositories".to_string()),
                (Method::Get, "/api/v6/jobSessions/s-1".to_string()),
            ]
        );
    }

    #[test]
    fn submission_errors() {
        let cases = [
            (200, "Submission"),
            (400, "Submission"),
            (401, "Unauthorized"),
            (403, "Forbidden"),
        ];
        for (status, expected) in cases {
            let client = move |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
                Ok(RawResponse::new(status, "nope"))
            };
            let tracker = SessionTracker::new(&client, Endpoints::default());
            let err = tracker
                .create_repository(&RepositoryRequest::default(), &policy(), &Cancellation::new())
                .unwrap_err();
            let name = match err {
                Error::Submission { status: s, .. } if s == status => "Submission",
                Error::Unauthorized { .. } => "Unauthorized",
                Error::Forbidden { .. } => "Forbidden",
                _ => "other",
            };
            assert_eq!(name, expected, "{}", status);
        }
    }

    #[test]
    fn failed_session_is_an_error() {
        let client = |method: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            match method {
                Method::Post => Ok(RawResponse::new(202, session("Running"))),
                _ => Ok(RawResponse::new(200, session("Failed"))),
            }
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);
        let err = tracker
            .create_repository(&RepositoryRequest::default(), &policy(), &Cancellation::new())
            .unwrap_err();
        assert!(matches!(err, Error::SessionFailed { ref status, .. } if status == "Failed"));
    }

    #[test]
    fn restore_collects_items() {
        let client = |method: Method, path: &str, _: Option<&Value>| -> Result<RawResponse> {
            let body = match (method, path) {
                (Method::Post, "/api/v6/restorePoints/virtualMachines/rp-1/restoreVm") => {
                    return Ok(RawResponse::new(
                        202,
                        json!({"id": "s-9", "type": "RestoreJob", "status": "Running"}).to_string(),
                    ))
                }
                (Method::Get, "/api/v6/jobSessions/s-9") => json!({
                    "id": "s-9",
                    "type": "RestoreJob",
                    "status": "Success",
                    "restoreJobInfo": {"restorePointId": "rp-1", "itemName": "vm-1"}
                }),
                (Method::Get, "/api/v6/jobSessions/s-9/restoredItems") => json!({
                    "results": [{"itemId": "vm-1-restored", "status": "Success"}],
                    "totalCount": 1
                }),
                _ => return Ok(RawResponse::new(404, "")),
            };
            Ok(RawResponse::new(200, body.to_string()))
        };
        let clock = ManualClock::new();
        let tracker = SessionTracker::new(&client, Endpoints::default()).with_clock(&clock);

        let result = tracker
            .restore_vm(
                "rp-1",
                &RestoreVmRequest::default(),
                &policy(),
                &Cancellation::new(),
            )
            .unwrap();
        assert_eq!(result.session_id, "s-9");
        assert_eq!(result.info.item_name.as_deref(), Some("vm-1"));
        assert_eq!(result.restored_items.len(), 1);
        assert_eq!(
            result.restored_items[0].item_id.as_deref(),
            Some("vm-1-restored")
        );
    }

    #[test]
    fn apply_policy_picks_verb() {
        let calls = RefCell::new(Vec::new());
        let client = |method: Method, path: &str, body: Option<&Value>| -> Result<RawResponse> {
            calls.borrow_mut().push((method, path.to_string()));
            assert!(body.unwrap().get("id").is_none());
            match method {
                Method::Post => Ok(RawResponse::new(
                    201,
                    json!({"id": "p-1", "name": "p"}).to_string(),
                )),
                _ => Ok(RawResponse::new(204, "")),
            }
        };
        let tracker = SessionTracker::new(&client, Endpoints::default());

        let created = tracker
            .apply_policy(&build(&json!({"name": "p"})).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(created.id.as_deref(), Some("p-1"));

        let updated = tracker
            .apply_policy(&build(&json!({"id": "p-1", "name": "p"})).unwrap())
            .unwrap();
        assert_eq!(updated, None);
        assert_eq!(
            *calls.borrow(),
            vec![
                (Method::Post, "/api/v6/policies/virtualMachines".to_string()),
                (Method::Put, "/api/v6/policies/virtualMachines/p-1".to_string()),
            ]
        );
    }
}
