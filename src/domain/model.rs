use crate::utils::error::EtlError;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "https://www.wsdot.wa.gov/Traffic/api";

/// A WSDOT Traveler Info dataset exposed as a REST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    CvRestrictions,
    HighwayAlerts,
    HighwayCameras,
    MountainPassConditions,
    TrafficFlow,
    WeatherInformation,
    TravelTimes,
}

impl Dataset {
    pub const ALL: [Dataset; 7] = [
        Dataset::CvRestrictions,
        Dataset::HighwayAlerts,
        Dataset::HighwayCameras,
        Dataset::MountainPassConditions,
        Dataset::TrafficFlow,
        Dataset::WeatherInformation,
        Dataset::TravelTimes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dataset::CvRestrictions => "CVRestrictions",
            Dataset::HighwayAlerts => "HighwayAlerts",
            Dataset::HighwayCameras => "HighwayCameras",
            Dataset::MountainPassConditions => "MountainPassConditions",
            Dataset::TrafficFlow => "TrafficFlow",
            Dataset::WeatherInformation => "WeatherInformation",
            Dataset::TravelTimes => "TravelTimes",
        }
    }

    /// Path of the JSON endpoint relative to the service base URL.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            Dataset::CvRestrictions => {
                "CVRestrictions/CVRestrictionsREST.svc/GetCommercialVehicleRestrictionsAsJson"
            }
            Dataset::HighwayAlerts => "HighwayAlerts/HighwayAlertsREST.svc/GetAlertsAsJson",
            Dataset::HighwayCameras => "HighwayCameras/HighwayCamerasREST.svc/GetCamerasAsJson",
            Dataset::MountainPassConditions => {
                "MountainPassConditions/MountainPassConditionsREST.svc/GetMountainPassConditionsAsJson"
            }
            Dataset::TrafficFlow => "TrafficFlow/TrafficFlowREST.svc/GetTrafficFlowsAsJson",
            Dataset::WeatherInformation => {
                "WeatherInformation/WeatherInformationREST.svc/GetCurrentWeatherInformationAsJson"
            }
            Dataset::TravelTimes => "TravelTimes/TravelTimesREST.svc/GetTravelTimesAsJson",
        }
    }

    /// All dataset names, sorted alphabetically.
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dataset {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| EtlError::UnknownDataset {
                name: s.to_string(),
            })
    }
}

/// A scalar cell of a flattened record.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    DateTime(DateTime<FixedOffset>),
}

impl FlatValue {
    /// Text rendering used for delimited table cells. Null becomes an empty cell.
    pub fn to_cell(&self) -> String {
        match self {
            FlatValue::Null => String::new(),
            FlatValue::Bool(b) => b.to_string(),
            FlatValue::Number(n) => n.to_string(),
            FlatValue::String(s) => s.clone(),
            FlatValue::DateTime(dt) => format_date_time(dt),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlatValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            FlatValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

fn format_date_time(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Serialize for FlatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlatValue::Null => serializer.serialize_unit(),
            FlatValue::Bool(b) => serializer.serialize_bool(*b),
            FlatValue::Number(n) => n.serialize(serializer),
            FlatValue::String(s) => serializer.serialize_str(s),
            FlatValue::DateTime(dt) => serializer.serialize_str(&format_date_time(dt)),
        }
    }
}

impl From<&str> for FlatValue {
    fn from(value: &str) -> Self {
        FlatValue::String(value.to_string())
    }
}

impl From<i64> for FlatValue {
    fn from(value: i64) -> Self {
        FlatValue::Number(value.into())
    }
}

impl From<bool> for FlatValue {
    fn from(value: bool) -> Self {
        FlatValue::Bool(value)
    }
}

/// One table row: field name to scalar value, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatRecord {
    pub fields: BTreeMap<String, FlatValue>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FlatValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

/// Outcome of loading one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub dataset: Dataset,
    pub record_count: usize,
    pub outputs: Vec<String>,
}
