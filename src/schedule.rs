//! Daily, weekly, monthly and yearly schedule tiers.
//!
//! Every tier exists in three shapes: the validated model ([`ScheduleRule`]),
//! a permissive wire mirror (`Raw*`, camelCase, every field optional) and the
//! snake_case declarative tree. Model <-> raw conversions carry all the
//! validation; the declarative side goes through [`crate::schema`].

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::{
    at_least_one, hours, in_range, DayFields, DayOfWeek, DayParts, DayTrigger, Month, Named,
    TimeOfDay,
};
use crate::error::{Error, Result};
use crate::retention::{RawRetention, RetentionRule};
use crate::schema::{self, Node};

/// Deserializes a wire fragment, reporting type mismatches against `field`.
pub(crate) fn parse_raw<T: DeserializeOwned>(field: &str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| Error::validation(field, e.to_string()))
}

pub(crate) fn to_value<T: Serialize>(raw: &T) -> Value {
    // Raw mirrors only hold strings, integers, booleans and nested raws.
    serde_json::to_value(raw).unwrap_or(Value::Null)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSchedule {
    pub hours: Option<Vec<u8>>,
    pub selected_days: Option<Vec<DayOfWeek>>,
    pub selected_months: Option<Vec<Month>>,
    pub snapshots_to_keep: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hours: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_days: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_months: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshots_to_keep: Option<i64>,
}

impl SnapshotSchedule {
    fn from_raw(prefix: &str, raw: RawSnapshot) -> Result<Self> {
        let field = |name: &str| format!("{}.{}", prefix, name);
        Ok(Self {
            hours: raw.hours.map(|h| hours(&field("hours"), &h)).transpose()?,
            selected_days: raw
                .selected_days
                .map(|d| DayOfWeek::parse_list(&field("selected_days"), &d))
                .transpose()?,
            selected_months: raw
                .selected_months
                .map(|m| Month::parse_list(&field("selected_months"), &m))
                .transpose()?,
            snapshots_to_keep: raw
                .snapshots_to_keep
                .map(|n| at_least_one(&field("snapshots_to_keep"), n))
                .transpose()?,
        })
    }

    fn to_raw(&self) -> RawSnapshot {
        RawSnapshot {
            hours: self
                .hours
                .as_ref()
                .map(|h| h.iter().map(|h| *h as i64).collect()),
            selected_days: self.selected_days.as_deref().map(DayOfWeek::names),
            selected_months: self.selected_months.as_deref().map(Month::names),
            snapshots_to_keep: self.snapshots_to_keep.map(i64::from),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupSchedule {
    pub hours: Option<Vec<u8>>,
    pub selected_days: Option<Vec<DayOfWeek>>,
    pub selected_months: Option<Vec<Month>>,
    pub retention: Option<RetentionRule>,
    pub target_repository_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBackup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hours: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_days: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_months: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retention: Option<RawRetention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_repository_id: Option<String>,
}

impl BackupSchedule {
    fn from_raw(prefix: &str, raw: RawBackup) -> Result<Self> {
        let field = |name: &str| format!("{}.{}", prefix, name);
        Ok(Self {
            hours: raw.hours.map(|h| hours(&field("hours"), &h)).transpose()?,
            selected_days: raw
                .selected_days
                .map(|d| DayOfWeek::parse_list(&field("selected_days"), &d))
                .transpose()?,
            selected_months: raw
                .selected_months
                .map(|m| Month::parse_list(&field("selected_months"), &m))
                .transpose()?,
            retention: raw
                .retention
                .map(|r| RetentionRule::from_raw(&field("retention"), r))
                .transpose()?
                .flatten(),
            target_repository_id: raw.target_repository_id,
        })
    }

    fn to_raw(&self) -> RawBackup {
        RawBackup {
            hours: self
                .hours
                .as_ref()
                .map(|h| h.iter().map(|h| *h as i64).collect()),
            selected_days: self.selected_days.as_deref().map(DayOfWeek::names),
            selected_months: self.selected_months.as_deref().map(Month::names),
            retention: self.retention.as_ref().map(RetentionRule::to_raw),
            target_repository_id: self.target_repository_id.clone(),
        }
    }
}

fn snapshot_from_raw(prefix: &str, raw: Option<RawSnapshot>) -> Result<Option<SnapshotSchedule>> {
    raw.map(|r| SnapshotSchedule::from_raw(&format!("{}.snapshot_schedule", prefix), r))
        .transpose()
}

fn backup_from_raw(prefix: &str, raw: Option<RawBackup>) -> Result<Option<BackupSchedule>> {
    raw.map(|r| BackupSchedule::from_raw(&format!("{}.backup_schedule", prefix), r))
        .transpose()
}

fn time_from_raw(field: String, raw: Option<String>) -> Result<Option<TimeOfDay>> {
    raw.map(|t| TimeOfDay::parse(&field, &t)).transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyKind {
    EveryDay,
    Weekdays,
    SelectedDays,
    Unknown,
}

impl Named for DailyKind {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("EveryDay", Self::EveryDay),
        ("Weekdays", Self::Weekdays),
        ("SelectedDays", Self::SelectedDays),
        ("Unknown", Self::Unknown),
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyTrigger {
    EveryDay,
    Weekdays,
    SelectedDays(Vec<DayOfWeek>),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySchedule {
    pub trigger: Option<DailyTrigger>,
    pub runs_per_hour: Option<u8>,
    pub snapshot_schedule: Option<SnapshotSchedule>,
    pub backup_schedule: Option<BackupSchedule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDaily {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    daily_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_days: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    runs_per_hour: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_schedule: Option<RawSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backup_schedule: Option<RawBackup>,
}

impl DailySchedule {
    const PREFIX: &'static str = "daily_schedule";

    fn from_raw(raw: RawDaily) -> Result<Self> {
        let field = |name: &str| format!("{}.{}", Self::PREFIX, name);

        let kind = raw
            .daily_type
            .map(|k| DailyKind::parse(&field("daily_type"), &k))
            .transpose()?;

        let trigger = match (kind, raw.selected_days) {
            (Some(DailyKind::SelectedDays), Some(days)) if !days.is_empty() => Some(
                DailyTrigger::SelectedDays(DayOfWeek::parse_list(&field("selected_days"), &days)?),
            ),
            (Some(DailyKind::SelectedDays), _) => {
                return Err(Error::validation(
                    field("selected_days"),
                    "must list at least one day when daily_type is SelectedDays",
                ))
            }
            (_, Some(_)) => {
                return Err(Error::validation(
                    field("selected_days"),
                    "only allowed when daily_type is SelectedDays",
                ))
            }
            (Some(DailyKind::EveryDay), None) => Some(DailyTrigger::EveryDay),
            (Some(DailyKind::Weekdays), None) => Some(DailyTrigger::Weekdays),
            (Some(DailyKind::Unknown), None) => Some(DailyTrigger::Unknown),
            (None, None) => None,
        };

        Ok(Self {
            trigger,
            runs_per_hour: raw
                .runs_per_hour
                .map(|n| in_range(&field("runs_per_hour"), n, 1, 24))
                .transpose()?,
            snapshot_schedule: snapshot_from_raw(Self::PREFIX, raw.snapshot_schedule)?,
            backup_schedule: backup_from_raw(Self::PREFIX, raw.backup_schedule)?,
        })
    }

    fn to_raw(&self) -> RawDaily {
        let (daily_type, selected_days) = match &self.trigger {
            None => (None, None),
            Some(DailyTrigger::EveryDay) => (Some(DailyKind::EveryDay), None),
            Some(DailyTrigger::Weekdays) => (Some(DailyKind::Weekdays), None),
            Some(DailyTrigger::Unknown) => (Some(DailyKind::Unknown), None),
            Some(DailyTrigger::SelectedDays(days)) => {
                (Some(DailyKind::SelectedDays), Some(DayOfWeek::names(days)))
            }
        };
        RawDaily {
            daily_type: daily_type.map(|k| k.name().to_string()),
            selected_days,
            runs_per_hour: self.runs_per_hour.map(i64::from),
            snapshot_schedule: self.snapshot_schedule.as_ref().map(SnapshotSchedule::to_raw),
            backup_schedule: self.backup_schedule.as_ref().map(BackupSchedule::to_raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub time_local: Option<TimeOfDay>,
    pub snapshot_schedule: Option<SnapshotSchedule>,
    pub backup_schedule: Option<BackupSchedule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawWeekly {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_local: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_schedule: Option<RawSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backup_schedule: Option<RawBackup>,
}

impl WeeklySchedule {
    const PREFIX: &'static str = "weekly_schedule";

    fn from_raw(raw: RawWeekly) -> Result<Self> {
        Ok(Self {
            time_local: time_from_raw(format!("{}.time_local", Self::PREFIX), raw.time_local)?,
            snapshot_schedule: snapshot_from_raw(Self::PREFIX, raw.snapshot_schedule)?,
            backup_schedule: backup_from_raw(Self::PREFIX, raw.backup_schedule)?,
        })
    }

    fn to_raw(&self) -> RawWeekly {
        RawWeekly {
            time_local: self.time_local.as_ref().map(|t| t.as_str().to_string()),
            snapshot_schedule: self.snapshot_schedule.as_ref().map(SnapshotSchedule::to_raw),
            backup_schedule: self.backup_schedule.as_ref().map(BackupSchedule::to_raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlySchedule {
    pub time_local: Option<TimeOfDay>,
    pub trigger: Option<DayTrigger>,
    pub snapshot_schedule: Option<SnapshotSchedule>,
    pub backup_schedule: Option<BackupSchedule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMonthly {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_local: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_month: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    monthly_last_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_schedule: Option<RawSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backup_schedule: Option<RawBackup>,
}

impl MonthlySchedule {
    const PREFIX: &'static str = "monthly_schedule";
    const DAY: DayFields = DayFields {
        prefix: Self::PREFIX,
        kind: "type",
        selected: "SelectedDay",
        last_day: Some("monthly_last_day"),
    };

    fn from_raw(raw: RawMonthly) -> Result<Self> {
        let trigger = Self::DAY.resolve(DayParts {
            kind: raw.kind,
            day_of_month: raw.day_of_month,
            day_of_week: raw.day_of_week,
            last_day: raw.monthly_last_day,
        })?;

        Ok(Self {
            time_local: time_from_raw(format!("{}.time_local", Self::PREFIX), raw.time_local)?,
            trigger,
            snapshot_schedule: snapshot_from_raw(Self::PREFIX, raw.snapshot_schedule)?,
            backup_schedule: backup_from_raw(Self::PREFIX, raw.backup_schedule)?,
        })
    }

    fn to_raw(&self) -> RawMonthly {
        let day = Self::DAY.split(self.trigger.as_ref());
        RawMonthly {
            time_local: self.time_local.as_ref().map(|t| t.as_str().to_string()),
            kind: day.kind,
            day_of_week: day.day_of_week,
            day_of_month: day.day_of_month,
            monthly_last_day: day.last_day,
            snapshot_schedule: self.snapshot_schedule.as_ref().map(SnapshotSchedule::to_raw),
            backup_schedule: self.backup_schedule.as_ref().map(BackupSchedule::to_raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearlySchedule {
    pub time_local: Option<TimeOfDay>,
    pub month: Option<Month>,
    pub trigger: Option<DayTrigger>,
    pub snapshot_schedule: Option<SnapshotSchedule>,
    pub backup_schedule: Option<BackupSchedule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawYearly {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_local: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    month: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_month: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    yearly_last_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_schedule: Option<RawSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backup_schedule: Option<RawBackup>,
}

impl YearlySchedule {
    const PREFIX: &'static str = "yearly_schedule";
    const DAY: DayFields = DayFields {
        prefix: Self::PREFIX,
        kind: "type",
        selected: "SelectedDay",
        last_day: Some("yearly_last_day"),
    };

    fn from_raw(raw: RawYearly) -> Result<Self> {
        let trigger = Self::DAY.resolve(DayParts {
            kind: raw.kind,
            day_of_month: raw.day_of_month,
            day_of_week: raw.day_of_week,
            last_day: raw.yearly_last_day,
        })?;

        Ok(Self {
            time_local: time_from_raw(format!("{}.time_local", Self::PREFIX), raw.time_local)?,
            month: raw
                .month
                .map(|m| Month::parse(&format!("{}.month", Self::PREFIX), &m))
                .transpose()?,
            trigger,
            snapshot_schedule: snapshot_from_raw(Self::PREFIX, raw.snapshot_schedule)?,
            backup_schedule: backup_from_raw(Self::PREFIX, raw.backup_schedule)?,
        })
    }

    fn to_raw(&self) -> RawYearly {
        let day = Self::DAY.split(self.trigger.as_ref());
        RawYearly {
            time_local: self.time_local.as_ref().map(|t| t.as_str().to_string()),
            month: self.month.map(|m| m.name().to_string()),
            kind: day.kind,
            day_of_week: day.day_of_week,
            day_of_month: day.day_of_month,
            yearly_last_day: day.last_day,
            snapshot_schedule: self.snapshot_schedule.as_ref().map(SnapshotSchedule::to_raw),
            backup_schedule: self.backup_schedule.as_ref().map(BackupSchedule::to_raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Daily, Tier::Weekly, Tier::Monthly, Tier::Yearly];

    pub fn wire_key(self) -> &'static str {
        match self {
            Tier::Daily => "dailySchedule",
            Tier::Weekly => "weeklySchedule",
            Tier::Monthly => "monthlySchedule",
            Tier::Yearly => "yearlySchedule",
        }
    }

    pub fn declared_key(self) -> &'static str {
        match self {
            Tier::Daily => DailySchedule::PREFIX,
            Tier::Weekly => WeeklySchedule::PREFIX,
            Tier::Monthly => MonthlySchedule::PREFIX,
            Tier::Yearly => YearlySchedule::PREFIX,
        }
    }

    fn schema(self) -> &'static Node {
        match self {
            Tier::Daily => &schema::DAILY,
            Tier::Weekly => &schema::WEEKLY,
            Tier::Monthly => &schema::MONTHLY,
            Tier::Yearly => &schema::YEARLY,
        }
    }

    fn from_key(key: &str) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|t| t.wire_key() == key || t.declared_key() == key)
    }
}

/// One schedule tier of a backup policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleRule {
    Daily(DailySchedule),
    Weekly(WeeklySchedule),
    Monthly(MonthlySchedule),
    Yearly(YearlySchedule),
}

impl ScheduleRule {
    pub fn tier(&self) -> Tier {
        match self {
            ScheduleRule::Daily(_) => Tier::Daily,
            ScheduleRule::Weekly(_) => Tier::Weekly,
            ScheduleRule::Monthly(_) => Tier::Monthly,
            ScheduleRule::Yearly(_) => Tier::Yearly,
        }
    }

    pub fn snapshot_schedule(&self) -> Option<&SnapshotSchedule> {
        match self {
            ScheduleRule::Daily(s) => s.snapshot_schedule.as_ref(),
            ScheduleRule::Weekly(s) => s.snapshot_schedule.as_ref(),
            ScheduleRule::Monthly(s) => s.snapshot_schedule.as_ref(),
            ScheduleRule::Yearly(s) => s.snapshot_schedule.as_ref(),
        }
    }

    pub fn backup_schedule(&self) -> Option<&BackupSchedule> {
        match self {
            ScheduleRule::Daily(s) => s.backup_schedule.as_ref(),
            ScheduleRule::Weekly(s) => s.backup_schedule.as_ref(),
            ScheduleRule::Monthly(s) => s.backup_schedule.as_ref(),
            ScheduleRule::Yearly(s) => s.backup_schedule.as_ref(),
        }
    }

    /// A tier without snapshot or backup schedule does nothing.
    pub fn is_enabled(&self) -> bool {
        self.snapshot_schedule().is_some() || self.backup_schedule().is_some()
    }

    /// Human summary of when the tier fires.
    pub fn trigger_summary(&self) -> String {
        match self {
            ScheduleRule::Daily(s) => {
                let base = match &s.trigger {
                    None => "daily".to_string(),
                    Some(DailyTrigger::EveryDay) => "every day".to_string(),
                    Some(DailyTrigger::Weekdays) => "weekdays".to_string(),
                    Some(DailyTrigger::Unknown) => "unknown".to_string(),
                    Some(DailyTrigger::SelectedDays(days)) => DayOfWeek::names(days).join(", "),
                };
                match s.runs_per_hour {
                    Some(n) => format!("{}, {} runs/hour", base, n),
                    None => base,
                }
            }
            ScheduleRule::Weekly(s) => match &s.time_local {
                Some(t) => format!("weekly at {}", t),
                None => "weekly".to_string(),
            },
            ScheduleRule::Monthly(s) => match &s.trigger {
                Some(t) => format!("monthly, {}", t),
                None => "monthly".to_string(),
            },
            ScheduleRule::Yearly(s) => {
                let month = s.month.map(|m| m.name()).unwrap_or("yearly");
                match &s.trigger {
                    Some(t) => format!("{}, {}", month, t),
                    None => month.to_string(),
                }
            }
        }
    }

    /// Wire form of the tier body, without the tier key.
    pub(crate) fn body(&self) -> Value {
        match self {
            ScheduleRule::Daily(s) => to_value(&s.to_raw()),
            ScheduleRule::Weekly(s) => to_value(&s.to_raw()),
            ScheduleRule::Monthly(s) => to_value(&s.to_raw()),
            ScheduleRule::Yearly(s) => to_value(&s.to_raw()),
        }
    }

    /// Parses a tier body in wire form.
    pub(crate) fn from_body(tier: Tier, body: &Value) -> Result<Self> {
        let field = tier.declared_key();
        Ok(match tier {
            Tier::Daily => ScheduleRule::Daily(DailySchedule::from_raw(parse_raw(field, body)?)?),
            Tier::Weekly => {
                ScheduleRule::Weekly(WeeklySchedule::from_raw(parse_raw(field, body)?)?)
            }
            Tier::Monthly => {
                ScheduleRule::Monthly(MonthlySchedule::from_raw(parse_raw(field, body)?)?)
            }
            Tier::Yearly => {
                ScheduleRule::Yearly(YearlySchedule::from_raw(parse_raw(field, body)?)?)
            }
        })
    }

    /// `{"<tier>Schedule": {...}}` with only configured fields present.
    pub fn to_wire(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.tier().wire_key().to_string(), self.body());
        Value::Object(map)
    }

    pub fn from_wire(value: &Value) -> Result<Self> {
        let (tier, body) = single_tier(value, Tier::wire_key)?;
        Self::from_body(tier, body)
    }

    /// Same as [`ScheduleRule::from_wire`] for a snake_case declarative tree.
    pub fn from_declared(value: &Value) -> Result<Self> {
        let (tier, body) = single_tier(value, Tier::declared_key)?;
        let wire = schema::expand(body, tier.schema(), tier.declared_key())?;
        debug!("{} expanded to {}", tier.declared_key(), wire);
        Self::from_body(tier, &wire)
    }

    pub fn to_declared(&self) -> Value {
        let tier = self.tier();
        let mut map = Map::new();
        map.insert(
            tier.declared_key().to_string(),
            schema::collapse(&self.body(), tier.schema()),
        );
        Value::Object(map)
    }
}

fn single_tier(value: &Value, key_of: fn(Tier) -> &'static str) -> Result<(Tier, &Value)> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::validation("schedule", "expected a block of settings"))?;
    if map.len() != 1 {
        return Err(Error::validation(
            "schedule",
            format!("expected exactly one schedule tier, found {}", map.len()),
        ));
    }
    let (key, body) = map
        .iter()
        .next()
        .ok_or_else(|| Error::validation("schedule", "empty"))?;
    match Tier::from_key(key) {
        Some(tier) if key_of(tier) == key.as_str() => Ok((tier, body)),
        _ => Err(Error::validation(key.as_str(), "not a schedule tier")),
    }
}
