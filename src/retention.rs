use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::calendar::{at_least_one, Named};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionUnit {
    Days,
    Months,
    Years,
    Unknown,
}

impl Named for RetentionUnit {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("Days", Self::Days),
        ("Months", Self::Months),
        ("Years", Self::Years),
        ("Unknown", Self::Unknown),
    ];
}

/// How long, or how many, backups are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionRule {
    Duration { quantity: u32, unit: RetentionUnit },
    Count(u32),
}

impl Display for RetentionRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RetentionRule::Duration { quantity, unit } => write!(f, "{} {}", quantity, unit.name()),
            RetentionRule::Count(n) => write!(f, "{} restore points", n),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRetention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_retention_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_duration_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

impl RetentionRule {
    /// An empty retention object carries no rule and yields `None`.
    pub(crate) fn from_raw(prefix: &str, raw: RawRetention) -> Result<Option<Self>> {
        let field = |name: &str| format!("{}.{}", prefix, name);

        match (raw.time_retention_duration, raw.retention_duration_type, raw.count) {
            (None, None, None) => Ok(None),
            (None, None, Some(count)) => Ok(Some(RetentionRule::Count(at_least_one(
                &field("count"),
                count,
            )?))),
            (_, _, Some(_)) => Err(Error::validation(
                field("count"),
                "conflicts with time_retention_duration/retention_duration_type",
            )),
            (Some(quantity), Some(unit), None) => Ok(Some(RetentionRule::Duration {
                quantity: at_least_one(&field("time_retention_duration"), quantity)?,
                unit: RetentionUnit::parse(&field("retention_duration_type"), &unit)?,
            })),
            (Some(_), None, None) => Err(Error::validation(
                field("retention_duration_type"),
                "required when time_retention_duration is set",
            )),
            (None, Some(_), None) => Err(Error::validation(
                field("time_retention_duration"),
                "required when retention_duration_type is set",
            )),
        }
    }

    pub(crate) fn to_raw(&self) -> RawRetention {
        match self {
            RetentionRule::Duration { quantity, unit } => RawRetention {
                time_retention_duration: Some(*quantity as i64),
                retention_duration_type: Some(unit.name().to_string()),
                count: None,
            },
            RetentionRule::Count(n) => RawRetention {
                count: Some(*n as i64),
                ..RawRetention::default()
            },
        }
    }
}
