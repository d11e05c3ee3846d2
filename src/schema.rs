//! Declarative documents use snake_case keys, the service speaks camelCase.
//!
//! The static [`Node`] trees below describe every key a policy document may
//! carry. [`expand`] walks a declarative tree against a schema, renames keys,
//! rejects unknown ones and drops explicit nulls (a null is "not configured").
//! [`collapse`] does the inverse on service documents and keeps only the keys
//! the schema knows, so server-side extras never leak into declared state.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

#[derive(Debug)]
pub enum Node {
    Leaf,
    List(&'static Node),
    Object(&'static [Field]),
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub node: Node,
}

macro_rules! leaf {
    ($name:literal) => {
        Field {
            name: $name,
            node: Node::Leaf,
        }
    };
}

macro_rules! list {
    ($name:literal) => {
        Field {
            name: $name,
            node: Node::List(&Node::Leaf),
        }
    };
    ($name:literal, $item:expr $(,)?) => {
        Field {
            name: $name,
            node: Node::List($item),
        }
    };
}

macro_rules! object {
    ($name:literal, $fields:expr $(,)?) => {
        Field {
            name: $name,
            node: Node::Object($fields),
        }
    };
}

const RETENTION: &[Field] = &[
    leaf!("time_retention_duration"),
    leaf!("retention_duration_type"),
    leaf!("count"),
];

const SNAPSHOT_SCHEDULE: &[Field] = &[
    list!("hours"),
    list!("selected_days"),
    list!("selected_months"),
    leaf!("snapshots_to_keep"),
];

const BACKUP_SCHEDULE: &[Field] = &[
    list!("hours"),
    list!("selected_days"),
    list!("selected_months"),
    object!("retention", RETENTION),
    leaf!("target_repository_id"),
];

pub const DAILY: Node = Node::Object(&[
    leaf!("daily_type"),
    list!("selected_days"),
    leaf!("runs_per_hour"),
    object!("snapshot_schedule", SNAPSHOT_SCHEDULE),
    object!("backup_schedule", BACKUP_SCHEDULE),
]);

pub const WEEKLY: Node = Node::Object(&[
    leaf!("time_local"),
    object!("snapshot_schedule", SNAPSHOT_SCHEDULE),
    object!("backup_schedule", BACKUP_SCHEDULE),
]);

pub const MONTHLY: Node = Node::Object(&[
    leaf!("time_local"),
    leaf!("type"),
    leaf!("day_of_week"),
    leaf!("day_of_month"),
    leaf!("monthly_last_day"),
    object!("snapshot_schedule", SNAPSHOT_SCHEDULE),
    object!("backup_schedule", BACKUP_SCHEDULE),
]);

pub const YEARLY: Node = Node::Object(&[
    leaf!("time_local"),
    leaf!("month"),
    leaf!("type"),
    leaf!("day_of_week"),
    leaf!("day_of_month"),
    leaf!("yearly_last_day"),
    object!("snapshot_schedule", SNAPSHOT_SCHEDULE),
    object!("backup_schedule", BACKUP_SCHEDULE),
]);

pub const HEALTH_CHECK: Node = Node::Object(&[
    leaf!("health_check_enabled"),
    leaf!("local_time"),
    leaf!("day_number_in_month"),
    leaf!("day_of_week"),
    leaf!("day_of_month"),
    list!("months"),
]);

const TAG: Node = Node::Object(&[leaf!("name"), leaf!("value")]);

const ITEMS: &[Field] = &[
    list!(
        "subscriptions",
        &Node::Object(&[leaf!("subscription_id")]),
    ),
    list!("resource_groups", &Node::Object(&[leaf!("id")])),
    list!("virtual_machines", &Node::Object(&[leaf!("id")])),
    list!("tags", &TAG),
    list!(
        "tag_groups",
        &Node::Object(&[leaf!("name"), list!("tags", &TAG)]),
    ),
];

pub const POLICY: Node = Node::Object(&[
    leaf!("id"),
    leaf!("name"),
    leaf!("description"),
    leaf!("is_enabled"),
    leaf!("tenant_id"),
    leaf!("service_account_id"),
    leaf!("backup_type"),
    list!("regions", &Node::Object(&[leaf!("region_id")])),
    object!("selected_items", ITEMS),
    object!("excluded_items", ITEMS),
    Field {
        name: "daily_schedule",
        node: DAILY,
    },
    Field {
        name: "weekly_schedule",
        node: WEEKLY,
    },
    Field {
        name: "monthly_schedule",
        node: MONTHLY,
    },
    Field {
        name: "yearly_schedule",
        node: YEARLY,
    },
    Field {
        name: "health_check_schedule",
        node: HEALTH_CHECK,
    },
    object!("retry_settings", &[leaf!("retry_count")]),
    object!(
        "policy_notification_settings",
        &[
            leaf!("recipient"),
            leaf!("notify_on_success"),
            leaf!("notify_on_warning"),
            leaf!("notify_on_failure"),
        ],
    ),
]);

/// `days_of_week` -> `daysOfWeek`
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

/// Declarative (snake_case) to wire (camelCase).
pub fn expand(value: &Value, node: &Node, path: &str) -> Result<Value> {
    match node {
        Node::Leaf => Ok(value.clone()),
        Node::List(item) => match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| expand(v, item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            _ => Err(Error::validation(path, "expected a list")),
        },
        Node::Object(fields) => {
            let map = value
                .as_object()
                .ok_or_else(|| Error::validation(path, "expected a block of settings"))?;
            let mut out = Map::new();
            for (key, v) in map {
                if v.is_null() {
                    continue;
                }
                let field = fields
                    .iter()
                    .find(|f| f.name == key.as_str())
                    .ok_or_else(|| Error::validation(join(path, key), "unknown field"))?;
                out.insert(snake_to_camel(key), expand(v, &field.node, &join(path, key))?);
            }
            Ok(Value::Object(out))
        }
    }
}

/// Wire (camelCase) to declarative (snake_case). Unknown keys are dropped.
pub fn collapse(value: &Value, node: &Node) -> Value {
    match (node, value) {
        (Node::List(item), Value::Array(items)) => {
            Value::Array(items.iter().map(|v| collapse(v, item)).collect())
        }
        (Node::Object(fields), Value::Object(map)) => {
            let mut out = Map::new();
            for field in fields.iter() {
                match map.get(&snake_to_camel(field.name)) {
                    None | Some(Value::Null) => {}
                    Some(v) => {
                        out.insert(field.name.to_string(), collapse(v, &field.node));
                    }
                }
            }
            Value::Object(out)
        }
        _ => value.clone(),
    }
}
