//! Create/read/update/delete of policies against the live service, with a
//! field-level diff so updates are only sent when something changed.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::client::{expect_accepted, expect_found, ApiClient, Method};
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::policy::{build, BackupPolicy};
use crate::tracker::SessionTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        })
    }
}

/// One differing field, addressed by its dotted snake_case path.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub path: String,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match (&self.old, &self.new) {
            (None, _) => ChangeKind::Added,
            (_, None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub changes: Vec<Change>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.path.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Unchanged,
    Updated(ChangeSet),
    /// The policy no longer exists remotely.
    Absent,
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn diff_objects(prefix: &str, old: &Map<String, Value>, new: &Map<String, Value>, out: &mut Vec<Change>) {
    let keys = old.keys().chain(new.keys()).collect::<BTreeSet<_>>();
    for key in keys {
        let path = join(prefix, key);
        match (old.get(key), new.get(key)) {
            (Some(Value::Object(o)), Some(Value::Object(n))) => diff_objects(&path, o, n, out),
            (o, n) if o != n => out.push(Change {
                path,
                old: o.cloned(),
                new: n.cloned(),
            }),
            _ => {}
        }
    }
}

/// Differences between two policies in declared form. Identity is ignored.
pub fn diff(old: &BackupPolicy, new: &BackupPolicy) -> ChangeSet {
    let declared = |policy: &BackupPolicy| {
        let mut value = policy.to_declared();
        if let Value::Object(map) = &mut value {
            map.remove("id");
        }
        value
    };

    let mut changes = Vec::new();
    match (declared(old), declared(new)) {
        (Value::Object(o), Value::Object(n)) => diff_objects("", &o, &n, &mut changes),
        (o, n) if o != n => changes.push(Change {
            path: String::new(),
            old: Some(o),
            new: Some(n),
        }),
        _ => {}
    }
    ChangeSet { changes }
}

pub struct PolicyStore<'a, C: ?Sized> {
    client: &'a C,
    endpoints: Endpoints,
}

impl<'a, C: ApiClient + ?Sized> PolicyStore<'a, C> {
    pub fn new(client: &'a C, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    fn tracker(&self) -> SessionTracker<'a, C> {
        SessionTracker::new(self.client, self.endpoints.clone())
    }

    /// Current remote policy, `None` if it does not exist.
    pub fn fetch(&self, id: &str) -> Result<Option<BackupPolicy>> {
        let path = self.endpoints.policy(id);
        let response = self.client.request(Method::Get, &path, None)?;
        match expect_found(response, &path) {
            Ok(response) => {
                let wire: Value = response.json()?;
                BackupPolicy::from_remote(&wire).map(Some)
            }
            Err(Error::NotFound { .. }) => {
                debug!("policy {} not found", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Current remote policy in declared form.
    pub fn read(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.fetch(id)?.map(|p| p.to_declared()))
    }

    /// Creates the policy; returns it as the service reports it.
    pub fn create(&self, declared: &Value) -> Result<BackupPolicy> {
        let request = build(declared)?;
        if request.is_update() {
            return Err(Error::validation("id", "assigned by the service on create"));
        }
        let echoed = match self.tracker().send_policy(&request)? {
            Some(echoed) => echoed,
            None => return Ok(request.policy),
        };
        match BackupPolicy::from_remote(&echoed) {
            Ok(created) => Ok(created),
            Err(e) => {
                // Created regardless; keep what was sent under the new identity.
                warn!(
                    "policy '{}' created, but its echo is unreadable: {}",
                    request.policy.name, e
                );
                let mut created = request.policy;
                created.id = echoed.get("id").and_then(Value::as_str).map(str::to_string);
                Ok(created)
            }
        }
    }

    /// Sends the declared policy only if it differs from the remote one.
    pub fn update(&self, id: &str, declared: &Value) -> Result<UpdateOutcome> {
        let mut request = build(declared)?;
        if let Some(declared_id) = request.id.as_deref() {
            if declared_id != id {
                return Err(Error::validation(
                    "id",
                    format!("declared {} but updating {}", declared_id, id),
                ));
            }
        }
        request.id = Some(id.to_string());

        let remote = match self.fetch(id)? {
            Some(remote) => remote,
            None => {
                warn!("policy {} is gone remotely", id);
                return Ok(UpdateOutcome::Absent);
            }
        };

        let changes = diff(&remote, &request.policy);
        if changes.is_empty() {
            debug!("policy {} is up to date", id);
            return Ok(UpdateOutcome::Unchanged);
        }
        info!("policy {}: {} field(s) changed", id, changes.changes.len());
        self.tracker().send_policy(&request)?;
        Ok(UpdateOutcome::Updated(changes))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.endpoints.policy(id);
        info!("{} {}", Method::Delete, path);
        let response = self.client.request(Method::Delete, &path, None)?;
        if response.status == 404 {
            return Err(Error::NotFound { path });
        }
        expect_accepted(response, &[200, 202, 204])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::client::RawResponse;

    fn remote() -> Value {
        json!({
            "id": "p-1",
            "name": "prod",
            "isEnabled": true,
            "dailySchedule": {
                "dailyType": "EveryDay",
                "snapshotSchedule": {"hours": [1], "snapshotsToKeep": 7}
            }
        })
    }

    fn declared() -> Value {
        json!({
            "name": "prod",
            "is_enabled": true,
            "daily_schedule": {
                "daily_type": "EveryDay",
                "snapshot_schedule": {"hours": [1], "snapshots_to_keep": 7}
            }
        })
    }

    type Calls = RefCell<Vec<(Method, String)>>;

    fn recording<'a>(
        calls: &'a Calls,
        get: &'a RawResponse,
    ) -> impl Fn(Method, &str, Option<&Value>) -> Result<RawResponse> + 'a {
        move |method, path, _| {
            calls.borrow_mut().push((method, path.to_string()));
            match method {
                Method::Get => Ok(get.clone()),
                _ => Ok(RawResponse::new(200, "")),
            }
        }
    }

    #[test]
    fn read_of_missing_policy_is_none() {
        let calls = Calls::default();
        let get = RawResponse::new(404, "");
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());
        assert_eq!(store.read("p-404").unwrap(), None);
    }

    #[test]
    fn read_reports_declared_form() {
        let calls = Calls::default();
        let get = RawResponse::new(200, remote().to_string());
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());

        let mut expected = declared();
        expected["id"] = json!("p-1");
        assert_eq!(store.read("p-1").unwrap(), Some(expected));
    }

    #[test]
    fn read_propagates_other_failures() {
        let calls = Calls::default();
        let get = RawResponse::new(500, "boom");
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());
        assert!(matches!(
            store.read("p-1"),
            Err(Error::Api { status: 500, .. })
        ));
    }

    #[test]
    fn update_without_changes_sends_nothing() {
        let calls = Calls::default();
        let get = RawResponse::new(200, remote().to_string());
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());

        assert_eq!(
            store.update("p-1", &declared()).unwrap(),
            UpdateOutcome::Unchanged
        );
        assert_eq!(
            *calls.borrow(),
            vec![(Method::Get, "/api/v6/policies/virtualMachines/p-1".to_string())]
        );
    }

    #[test]
    fn update_with_changes_puts() {
        let calls = Calls::default();
        let get = RawResponse::new(200, remote().to_string());
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());

        let mut changed = declared();
        changed["daily_schedule"]["snapshot_schedule"]["snapshots_to_keep"] = json!(14);
        let outcome = store.update("p-1", &changed).unwrap();

        let changes = match outcome {
            UpdateOutcome::Updated(changes) => changes,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(
            changes.changes,
            vec![Change {
                path: "daily_schedule.snapshot_schedule.snapshots_to_keep".to_string(),
                old: Some(json!(7)),
                new: Some(json!(14)),
            }]
        );
        assert_eq!(calls.borrow()[1].0, Method::Put);
    }

    #[test]
    fn update_of_vanished_policy_is_absent() {
        let calls = Calls::default();
        let get = RawResponse::new(404, "");
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());
        assert_eq!(
            store.update("p-1", &declared()).unwrap(),
            UpdateOutcome::Absent
        );
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn update_rejects_conflicting_identity() {
        let calls = Calls::default();
        let get = RawResponse::new(200, remote().to_string());
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());

        let mut other = declared();
        other["id"] = json!("p-2");
        let err = store.update("p-1", &other).unwrap_err();
        assert_eq!(err.field(), Some("id"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn delete_of_missing_policy_fails() {
        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            Ok(RawResponse::new(404, ""))
        };
        let store = PolicyStore::new(&client, Endpoints::default());
        assert!(matches!(
            store.delete("p-1"),
            Err(Error::NotFound { ref path }) if path == "/api/v6/policies/virtualMachines/p-1"
        ));

        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            Ok(RawResponse::new(204, ""))
        };
        let store = PolicyStore::new(&client, Endpoints::default());
        assert!(store.delete("p-1").is_ok());
    }

    #[test]
    fn create_returns_echoed_policy() {
        let client = |method: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            assert_eq!(method, Method::Post);
            Ok(RawResponse::new(201, remote().to_string()))
        };
        let store = PolicyStore::new(&client, Endpoints::default());
        let created = store.create(&declared()).unwrap();
        assert_eq!(created.id.as_deref(), Some("p-1"));

        let mut with_id = declared();
        with_id["id"] = json!("p-1");
        assert_eq!(store.create(&with_id).unwrap_err().field(), Some("id"));
    }

    #[test]
    fn invalid_remote_policy_is_a_protocol_error() {
        let calls = Calls::default();
        let get = RawResponse::new(
            200,
            json!({
                "id": "p-1",
                "name": "prod",
                "dailySchedule": {
                    "dailyType": "SelectedDays",
                    "selectedDays": [],
                    "snapshotSchedule": {"snapshotsToKeep": 7}
                }
            })
            .to_string(),
        );
        let client = recording(&calls, &get);
        let store = PolicyStore::new(&client, Endpoints::default());

        let err = store.read("p-1").unwrap_err();
        assert!(matches!(err, Error::Protocol(_)), "{}", err);
        let err = store.update("p-1", &declared()).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)), "{}", err);
    }

    #[test]
    fn create_keeps_identity_of_unreadable_echo() {
        let client = |_: Method, _: &str, _: Option<&Value>| -> Result<RawResponse> {
            Ok(RawResponse::new(
                201,
                json!({"id": "p-9", "backupType": "AllSubscriptions", "selectedItems": {}})
                    .to_string(),
            ))
        };
        let store = PolicyStore::new(&client, Endpoints::default());

        let created = store.create(&declared()).unwrap();
        assert_eq!(created.id.as_deref(), Some("p-9"));
        assert_eq!(created.name, "prod");
    }

    #[test]
    fn diff_walks_nested_fields() {
        let old = BackupPolicy::from_wire(&remote()).unwrap();
        let new = BackupPolicy::from_declared(&json!({
            "name": "prod",
            "description": "nightly",
            "daily_schedule": {
                "daily_type": "Weekdays",
                "snapshot_schedule": {"hours": [1], "snapshots_to_keep": 7}
            }
        }))
        .unwrap();

        let changes = diff(&old, &new);
        assert_eq!(
            changes.paths(),
            vec!["daily_schedule.daily_type", "description", "is_enabled"]
        );
        let kinds = changes.changes.iter().map(Change::kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![ChangeKind::Modified, ChangeKind::Added, ChangeKind::Removed]
        );
        assert!(diff(&old, &old).is_empty());
    }
}
