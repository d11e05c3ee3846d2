use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::{DayFields, DayParts, DayTrigger, Month, Named, TimeOfDay};
use crate::error::Result;
use crate::schedule::{parse_raw, to_value};

/// When the service verifies the consistency of stored backups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthCheckSchedule {
    pub enabled: Option<bool>,
    pub local_time: Option<TimeOfDay>,
    pub trigger: Option<DayTrigger>,
    pub months: Option<Vec<Month>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHealthCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    health_check_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_number_in_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day_of_month: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    months: Option<Vec<String>>,
}

impl HealthCheckSchedule {
    const PREFIX: &'static str = "health_check_schedule";
    const DAY: DayFields = DayFields {
        prefix: Self::PREFIX,
        kind: "day_number_in_month",
        selected: "OnDay",
        last_day: None,
    };

    pub(crate) fn from_wire(value: &Value) -> Result<Self> {
        let raw: RawHealthCheck = parse_raw(Self::PREFIX, value)?;
        let field = |name: &str| format!("{}.{}", Self::PREFIX, name);

        Ok(Self {
            enabled: raw.health_check_enabled,
            local_time: raw
                .local_time
                .map(|t| TimeOfDay::parse(&field("local_time"), &t))
                .transpose()?,
            trigger: Self::DAY.resolve(DayParts {
                kind: raw.day_number_in_month,
                day_of_month: raw.day_of_month,
                day_of_week: raw.day_of_week,
                last_day: None,
            })?,
            months: raw
                .months
                .map(|m| Month::parse_list(&field("months"), &m))
                .transpose()?,
        })
    }

    pub(crate) fn to_wire(&self) -> Value {
        let day = Self::DAY.split(self.trigger.as_ref());
        to_value(&RawHealthCheck {
            health_check_enabled: self.enabled,
            local_time: self.local_time.as_ref().map(|t| t.as_str().to_string()),
            day_number_in_month: day.kind,
            day_of_week: day.day_of_week,
            day_of_month: day.day_of_month,
            months: self.months.as_deref().map(Month::names),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::calendar::{DayOfWeek, Ordinal};

    #[test]
    fn round_trip() {
        let cases = [
            HealthCheckSchedule::default(),
            HealthCheckSchedule {
                enabled: Some(true),
                local_time: Some(TimeOfDay::parse("t", "04:15").unwrap()),
                trigger: Some(DayTrigger::Weekday {
                    ordinal: Ordinal::First,
                    day: DayOfWeek::Saturday,
                }),
                months: Some(vec![Month::March, Month::September]),
            },
            HealthCheckSchedule {
                enabled: Some(false),
                trigger: Some(DayTrigger::DayOfMonth(10)),
                ..HealthCheckSchedule::default()
            },
        ];

        for schedule in cases {
            let wire = schedule.to_wire();
            assert_eq!(HealthCheckSchedule::from_wire(&wire).unwrap(), schedule);
        }
    }

    #[test]
    fn on_day_uses_day_of_month() {
        let wire = json!({"healthCheckEnabled": true, "dayNumberInMonth": "OnDay", "dayOfMonth": 5});
        let schedule = HealthCheckSchedule::from_wire(&wire).unwrap();
        assert_eq!(schedule.trigger, Some(DayTrigger::DayOfMonth(5)));
        assert_eq!(schedule.to_wire(), wire);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            (json!({"dayNumberInMonth": "OnDay"}), "health_check_schedule.day_of_month"),
            (json!({"dayNumberInMonth": "Sixth"}), "health_check_schedule.day_number_in_month"),
            (json!({"months": ["May", "Jun"]}), "health_check_schedule.months[1]"),
            (json!({"localTime": "7am"}), "health_check_schedule.local_time"),
        ];
        for (wire, field) in cases {
            let err = HealthCheckSchedule::from_wire(&wire).unwrap_err();
            assert_eq!(err.field(), Some(field), "{}", err);
        }
    }
}
