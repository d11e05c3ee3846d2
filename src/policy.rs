//! Backup policies and the request builder.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::in_range;
use crate::client::Method;
use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::health_check::HealthCheckSchedule;
use crate::schedule::{parse_raw, to_value, ScheduleRule, Tier};
use crate::schema;
use crate::scope::{RawItems, SelectionScope};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_warning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_failure: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRetrySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retry_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRegion {
    region_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backup_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regions: Option<Vec<RawRegion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_items: Option<RawItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    excluded_items: Option<RawItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    health_check_schedule: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retry_settings: Option<RawRetrySettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    policy_notification_settings: Option<NotificationSettings>,
}

/// A backup policy as configured, after validation and normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupPolicy {
    /// Assigned by the service on creation.
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub is_enabled: Option<bool>,
    pub tenant_id: Option<String>,
    pub service_account_id: Option<String>,
    pub regions: Option<Vec<String>>,
    pub scope: Option<SelectionScope>,
    /// Enabled tiers only, ordered daily to yearly.
    pub schedules: Vec<ScheduleRule>,
    pub health_check: Option<HealthCheckSchedule>,
    pub retry_count: Option<u32>,
    pub notification: Option<NotificationSettings>,
}

impl BackupPolicy {
    pub fn schedule(&self, tier: Tier) -> Option<&ScheduleRule> {
        self.schedules.iter().find(|s| s.tier() == tier)
    }

    /// Parses a policy document in wire form.
    pub fn from_wire(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| Error::validation("policy", "expected a block of settings"))?;
        let raw: RawPolicy = parse_raw("policy", value)?;

        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| Error::validation("name", "required"))?;

        let scope =
            SelectionScope::from_parts(raw.backup_type, raw.selected_items, raw.excluded_items)?;
        if let Some(scope) = &scope {
            for id in scope.ineffective_exclusions() {
                info!(
                    "policy '{}': excluded virtual machine {} is not included, exclusion has no effect",
                    name, id
                );
            }
        }

        let mut schedules = Vec::new();
        for tier in Tier::ALL {
            let body = match map.get(tier.wire_key()) {
                None | Some(Value::Null) => continue,
                Some(body) => body,
            };
            let rule = ScheduleRule::from_body(tier, body)?;
            if rule.is_enabled() {
                schedules.push(rule);
            } else {
                debug!(
                    "policy '{}': {} has neither snapshot nor backup schedule, tier disabled",
                    name,
                    tier.declared_key()
                );
            }
        }

        Ok(Self {
            id: raw.id,
            name,
            description: raw.description,
            is_enabled: raw.is_enabled,
            tenant_id: raw.tenant_id,
            service_account_id: raw.service_account_id,
            regions: raw
                .regions
                .map(|r| r.into_iter().map(|r| r.region_id).collect()),
            scope,
            schedules,
            health_check: raw
                .health_check_schedule
                .as_ref()
                .filter(|v| !v.is_null())
                .map(HealthCheckSchedule::from_wire)
                .transpose()?,
            retry_count: raw
                .retry_settings
                .and_then(|r| r.retry_count)
                .map(|n| in_range("retry_settings.retry_count", n, 0, u32::MAX as i64))
                .transpose()?,
            notification: raw.policy_notification_settings,
        })
    }

    /// Parses a policy document sent by the service. Anything it rejects
    /// is the service's inconsistency, not a local input error.
    pub fn from_remote(value: &Value) -> Result<Self> {
        Self::from_wire(value).map_err(|e| match e {
            Error::Validation { field, reason } => Error::protocol(format!(
                "service returned a policy with invalid {}: {}",
                field, reason
            )),
            Error::IncompleteScope => Error::protocol(
                "service returned a SelectedItems policy without any selected item",
            ),
            other => other,
        })
    }

    /// Wire form, including the identity when known.
    pub fn to_wire(&self) -> Value {
        let (backup_type, selected_items, excluded_items) = match &self.scope {
            Some(scope) => {
                let (t, s, e) = scope.to_parts();
                (Some(t), s, e)
            }
            None => (None, None, None),
        };

        let raw = RawPolicy {
            id: self.id.clone(),
            name: Some(self.name.clone()),
            description: self.description.clone(),
            is_enabled: self.is_enabled,
            tenant_id: self.tenant_id.clone(),
            service_account_id: self.service_account_id.clone(),
            backup_type,
            regions: self.regions.as_ref().map(|r| {
                r.iter()
                    .map(|id| RawRegion {
                        region_id: id.clone(),
                    })
                    .collect()
            }),
            selected_items,
            excluded_items,
            health_check_schedule: self.health_check.as_ref().map(HealthCheckSchedule::to_wire),
            retry_settings: self.retry_count.map(|n| RawRetrySettings {
                retry_count: Some(i64::from(n)),
            }),
            policy_notification_settings: self.notification.clone(),
        };

        let mut value = to_value(&raw);
        if let Value::Object(map) = &mut value {
            for rule in &self.schedules {
                map.insert(rule.tier().wire_key().to_string(), rule.body());
            }
        }
        value
    }

    /// Parses a snake_case declarative policy document.
    pub fn from_declared(value: &Value) -> Result<Self> {
        let wire = schema::expand(value, &schema::POLICY, "")?;
        Self::from_wire(&wire)
    }

    /// Declarative form, as reported back to the caller.
    pub fn to_declared(&self) -> Value {
        schema::collapse(&self.to_wire(), &schema::POLICY)
    }
}

/// A validated policy mutation, ready for submission.
///
/// Whether it creates or updates is decided by the presence of `id`; the
/// tracker picks the HTTP verb from that.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRequest {
    pub id: Option<String>,
    pub policy: BackupPolicy,
    /// Request body; never carries the identity.
    pub body: Value,
}

impl PolicyRequest {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    /// POST to the collection for a new policy, PUT to the policy itself otherwise.
    pub fn route(&self, endpoints: &Endpoints) -> (Method, String) {
        match &self.id {
            Some(id) => (Method::Put, endpoints.policy(id)),
            None => (Method::Post, endpoints.policies()),
        }
    }
}

/// Builds a policy request from a declarative document.
pub fn build(declared: &Value) -> Result<PolicyRequest> {
    let policy = BackupPolicy::from_declared(declared)?;

    let mut body = policy.to_wire();
    if let Value::Object(map) = &mut body {
        map.remove("id");
    }
    debug!("policy '{}' request body: {}", policy.name, body);

    Ok(PolicyRequest {
        id: policy.id.clone(),
        policy,
        body,
    })
}

/// Keys of `body` in a stable order, for display.
pub fn wire_keys(body: &Value) -> Vec<String> {
    body.as_object()
        .map(Map::keys)
        .into_iter()
        .flatten()
        .cloned()
        .collect()
}
