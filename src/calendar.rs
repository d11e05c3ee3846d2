//! Calendar vocabulary shared by the schedule tiers: day and month names,
//! ordinals, hours, times of day and the day-of-period trigger used by the
//! monthly, yearly and health-check schedules.

use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// An enumeration with a fixed set of wire names.
pub trait Named: Copy + PartialEq + 'static {
    const NAMES: &'static [(&'static str, Self)];

    fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, v)| *v == self)
            .map(|(n, _)| *n)
            .unwrap_or("Unknown")
    }

    fn parse(field: &str, value: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == value)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                let allowed = Self::NAMES.iter().map(|(n, _)| *n).collect::<Vec<_>>();
                Error::validation(
                    field,
                    format!("'{}' is not one of {}", value, allowed.join(", ")),
                )
            })
    }

    fn parse_list(field: &str, values: &[String]) -> Result<Vec<Self>> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Self::parse(&format!("{}[{}]", field, i), v))
            .collect()
    }

    fn names(values: &[Self]) -> Vec<String> {
        values.iter().map(|v| v.name().to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Named for DayOfWeek {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("Monday", Self::Monday),
        ("Tuesday", Self::Tuesday),
        ("Wednesday", Self::Wednesday),
        ("Thursday", Self::Thursday),
        ("Friday", Self::Friday),
        ("Saturday", Self::Saturday),
        ("Sunday", Self::Sunday),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Named for Month {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("January", Self::January),
        ("February", Self::February),
        ("March", Self::March),
        ("April", Self::April),
        ("May", Self::May),
        ("June", Self::June),
        ("July", Self::July),
        ("August", Self::August),
        ("September", Self::September),
        ("October", Self::October),
        ("November", Self::November),
        ("December", Self::December),
    ];
}

/// Which occurrence of a weekday inside a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ordinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Named for Ordinal {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("First", Self::First),
        ("Second", Self::Second),
        ("Third", Self::Third),
        ("Fourth", Self::Fourth),
        ("Last", Self::Last),
    ];
}

static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time of day pattern"));

/// A time of day in `HH:MM`, 24-hour clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOfDay(String);

impl TimeOfDay {
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        if TIME_OF_DAY.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(Error::validation(
                field,
                format!("'{}' is not a time of day (HH:MM)", value),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks that `value` lies in `[min, max]` and narrows it.
pub(crate) fn in_range<T: TryFrom<i64>>(field: &str, value: i64, min: i64, max: i64) -> Result<T> {
    if value < min || value > max {
        return Err(Error::validation(
            field,
            format!("{} is not between {} and {}", value, min, max),
        ));
    }
    T::try_from(value).map_err(|_| Error::validation(field, format!("{} is out of range", value)))
}

pub(crate) fn hours(field: &str, values: &[i64]) -> Result<Vec<u8>> {
    values
        .iter()
        .enumerate()
        .map(|(i, h)| in_range(&format!("{}[{}]", field, i), *h, 0, 23))
        .collect()
}

pub(crate) fn at_least_one(field: &str, value: i64) -> Result<u32> {
    in_range(field, value, 1, u32::MAX as i64)
}

/// Which day of the month (or of the chosen month, for yearly schedules) a
/// schedule runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayTrigger {
    DayOfMonth(u8),
    Weekday { ordinal: Ordinal, day: DayOfWeek },
    LastDay,
}

impl Display for DayTrigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DayTrigger::DayOfMonth(d) => write!(f, "day {}", d),
            DayTrigger::Weekday { ordinal, day } => write!(f, "{} {}", ordinal.name(), day.name()),
            DayTrigger::LastDay => write!(f, "last day"),
        }
    }
}

/// Declarative names of the fields making up a [`DayTrigger`] in one tier.
pub(crate) struct DayFields {
    pub prefix: &'static str,
    pub kind: &'static str,
    /// Value of `kind` that selects a day of the month.
    pub selected: &'static str,
    pub last_day: Option<&'static str>,
}

/// Flat wire view of a [`DayTrigger`].
#[derive(Debug, Default, PartialEq)]
pub(crate) struct DayParts {
    pub kind: Option<String>,
    pub day_of_month: Option<i64>,
    pub day_of_week: Option<String>,
    pub last_day: Option<bool>,
}

impl DayFields {
    fn path(&self, name: &str) -> String {
        format!("{}.{}", self.prefix, name)
    }

    pub fn resolve(&self, parts: DayParts) -> Result<Option<DayTrigger>> {
        let last_day = parts.last_day.unwrap_or(false);

        if last_day {
            let last_key = self.last_day.unwrap_or("last_day");
            if parts.day_of_month.is_some() {
                return Err(Error::validation(
                    self.path("day_of_month"),
                    format!("conflicts with {}", last_key),
                ));
            }
            if parts.day_of_week.is_some() {
                return Err(Error::validation(
                    self.path("day_of_week"),
                    format!("conflicts with {}", last_key),
                ));
            }
            match parts.kind.as_deref() {
                None => {}
                Some(k) if k == self.selected => {}
                Some(k) => {
                    return Err(Error::validation(
                        self.path(self.kind),
                        format!("'{}' conflicts with {}", k, last_key),
                    ))
                }
            }
            return Ok(Some(DayTrigger::LastDay));
        }

        let kind = match parts.kind {
            Some(kind) => kind,
            None => {
                if parts.day_of_month.is_some() || parts.day_of_week.is_some() {
                    return Err(Error::validation(
                        self.path(self.kind),
                        "required when day_of_month or day_of_week is set",
                    ));
                }
                return Ok(None);
            }
        };

        if kind == self.selected {
            if parts.day_of_week.is_some() {
                return Err(Error::validation(
                    self.path("day_of_week"),
                    format!("not allowed when {} is {}", self.kind, self.selected),
                ));
            }
            let day = parts.day_of_month.ok_or_else(|| {
                Error::validation(
                    self.path("day_of_month"),
                    format!("required when {} is {}", self.kind, self.selected),
                )
            })?;
            return Ok(Some(DayTrigger::DayOfMonth(in_range(
                &self.path("day_of_month"),
                day,
                1,
                31,
            )?)));
        }

        let ordinal = Ordinal::parse(&self.path(self.kind), &kind).map_err(|_| {
            Error::validation(
                self.path(self.kind),
                format!(
                    "'{}' is not one of First, Second, Third, Fourth, Last, {}",
                    kind, self.selected
                ),
            )
        })?;
        if parts.day_of_month.is_some() {
            return Err(Error::validation(
                self.path("day_of_month"),
                format!("not allowed when {} is {}", self.kind, kind),
            ));
        }
        let day = parts.day_of_week.ok_or_else(|| {
            Error::validation(
                self.path("day_of_week"),
                format!("required when {} is {}", self.kind, kind),
            )
        })?;
        let day = DayOfWeek::parse(&self.path("day_of_week"), &day)?;

        Ok(Some(DayTrigger::Weekday { ordinal, day }))
    }

    pub fn split(&self, trigger: Option<&DayTrigger>) -> DayParts {
        match trigger {
            None => DayParts::default(),
            Some(DayTrigger::DayOfMonth(d)) => DayParts {
                kind: Some(self.selected.to_string()),
                day_of_month: Some(*d as i64),
                ..DayParts::default()
            },
            Some(DayTrigger::Weekday { ordinal, day }) => DayParts {
                kind: Some(ordinal.name().to_string()),
                day_of_week: Some(day.name().to_string()),
                ..DayParts::default()
            },
            Some(DayTrigger::LastDay) => DayParts {
                last_day: Some(true),
                ..DayParts::default()
            },
        }
    }
}
