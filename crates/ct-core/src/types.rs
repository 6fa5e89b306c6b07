use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{ids::*, model::*, CoreError, CoreResult};

/// A field read off a record for filtering or sorting.
/// Missing sorts below every present value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

/// Anything the selection and listing views operate over.
pub trait Record {
    fn id(&self) -> &str;
    fn field(&self, key: &str) -> FieldValue<'_>;
}

/// `HH:MM` wall-clock times as they appear in configs and datasets.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s.trim(), FORMAT)
    }

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(d)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> CoreResult<Self> {
        let w = Self { start, end };
        w.validate()?;
        Ok(w)
    }

    /// Parse `"09:00"`, `"18:00"` style bounds.
    pub fn parse(start: &str, end: &str) -> CoreResult<Self> {
        let start = hhmm::parse(start).map_err(|e| CoreError::validation(format!("bad start time {start:?}: {e}")))?;
        let end = hhmm::parse(end).map_err(|e| CoreError::validation(format!("bad end time {end:?}: {e}")))?;
        Self::new(start, end)
    }

    /// Visit slot: from `start` to the top of the next hour (23:59 at the latest).
    pub fn hour_from(start: NaiveTime) -> Self {
        let end = match start.hour() {
            h if h < 23 => NaiveTime::from_hms_opt(h + 1, 0, 0),
            _ => NaiveTime::from_hms_opt(23, 59, 0),
        };
        Self { start, end: end.unwrap_or(start) }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.start >= self.end {
            return Err(CoreError::validation(format!(
                "time window start {} must be before end {}",
                self.start.format(hhmm::FORMAT),
                self.end.format(hhmm::FORMAT)
            )));
        }
        Ok(())
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format(hhmm::FORMAT), self.end.format(hhmm::FORMAT))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PjpVisit {
    pub outlet: String,
    pub phone: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub location: String,
    pub expected_value: u64,
    pub status: VisitStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SalesRep {
    pub id: RepId,
    pub name: String,
    pub territory: String,
    pub today_outlets: u32,
    pub estimated_value: u64,
    #[serde(default)]
    pub pjp_today: Vec<PjpVisit>,
}

impl SalesRep {
    pub fn missed_visits(&self) -> usize {
        self.pjp_today.iter().filter(|v| v.status == VisitStatus::Missed).count()
    }
}

impl Record for SalesRep {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "name" => FieldValue::Text(&self.name),
            "territory" => FieldValue::Text(&self.territory),
            "today_outlets" => FieldValue::Number(self.today_outlets as f64),
            "estimated_value" => FieldValue::Number(self.estimated_value as f64),
            "missed" => FieldValue::Number(self.missed_visits() as f64),
            _ => FieldValue::Missing,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Outlet {
    pub id: OutletId,
    pub name: String,
    pub phones: Vec<String>,
    pub window: TimeWindow,
    pub expected_value: u64,
    pub language: Language,
    pub whatsapp_opt_in: bool,
    pub last_order_days: u32,
    pub priority: Priority,
    pub rep_id: RepId,
    pub in_pjp: bool,
    #[serde(default)]
    pub dnd: bool,
}

impl Outlet {
    pub fn primary_phone(&self) -> Option<&str> {
        self.phones.first().map(String::as_str)
    }
}

impl Record for Outlet {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> FieldValue<'_> {
        match key {
            "name" => FieldValue::Text(&self.name),
            "phone" => self.primary_phone().map(FieldValue::Text).unwrap_or(FieldValue::Missing),
            "language" => FieldValue::Text(self.language.as_str()),
            "priority" => FieldValue::Text(self.priority.as_str()),
            "priority_rank" => FieldValue::Number(self.priority.rank() as f64),
            "expected_value" => FieldValue::Number(self.expected_value as f64),
            "last_order_days" => FieldValue::Number(self.last_order_days as f64),
            "window_start" => FieldValue::Number(self.window.start.num_seconds_from_midnight() as f64),
            _ => FieldValue::Missing,
        }
    }
}
