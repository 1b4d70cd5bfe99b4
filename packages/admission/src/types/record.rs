//! Raw registry records and the admitted form persisted after the pipeline.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Official registry a record was scraped from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrySource {
    CompaniesHouse,
    Gleif,
    SecEdgar,
    Asic,
}

impl RegistrySource {
    pub const ALL: [RegistrySource; 4] = [
        RegistrySource::CompaniesHouse,
        RegistrySource::Gleif,
        RegistrySource::SecEdgar,
        RegistrySource::Asic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrySource::CompaniesHouse => "COMPANIES_HOUSE",
            RegistrySource::Gleif => "GLEIF",
            RegistrySource::SecEdgar => "SEC_EDGAR",
            RegistrySource::Asic => "ASIC",
        }
    }
}

impl std::fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown registry source string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registry source: {0}")]
pub struct UnknownRegistrySource(pub String);

impl std::str::FromStr for RegistrySource {
    type Err = UnknownRegistrySource;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match key.as_str() {
            "COMPANIES_HOUSE" => Ok(RegistrySource::CompaniesHouse),
            "GLEIF" => Ok(RegistrySource::Gleif),
            "SEC_EDGAR" => Ok(RegistrySource::SecEdgar),
            "ASIC" => Ok(RegistrySource::Asic),
            _ => Err(UnknownRegistrySource(s.to_string())),
        }
    }
}

/// Normalized legal status of an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityStatus {
    Active,
    Inactive,
    Dissolved,
    Unknown,
}

const INACTIVE_MARKERS: &[&str] = &["inactive", "dormant", "lapsed", "suspended"];
const DISSOLVED_MARKERS: &[&str] = &[
    "dissolved",
    "struck off",
    "closed",
    "liquidation",
    "deregistered",
    "removed",
    "cancelled",
];
const ACTIVE_MARKERS: &[&str] = &[
    "active",
    "live",
    "registered",
    "good standing",
    "current",
    "issued",
];

impl EntityStatus {
    /// Map free-form registry status text onto the four known values.
    ///
    /// Negative markers are checked first: "inactive" contains "active".
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return EntityStatus::Unknown;
        };
        let lower = raw.trim().to_lowercase().replace(['_', '-'], " ");
        if lower.is_empty() {
            EntityStatus::Unknown
        } else if INACTIVE_MARKERS.iter().any(|m| lower.contains(m)) {
            EntityStatus::Inactive
        } else if DISSOLVED_MARKERS.iter().any(|m| lower.contains(m)) {
            EntityStatus::Dissolved
        } else if ACTIVE_MARKERS.iter().any(|m| lower.contains(m)) {
            EntityStatus::Active
        } else {
            EntityStatus::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityStatus::Active => "Active",
            EntityStatus::Inactive => "Inactive",
            EntityStatus::Dissolved => "Dissolved",
            EntityStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A company record as produced by a registry scraper.
///
/// `registry_source` stays a string here so an unknown source rejects only
/// that record rather than the whole callback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEntityRecord {
    pub legal_name: String,
    pub registry_id: String,
    pub registry_source: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub incorporation_date: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub trading_name: Option<String>,
    /// Passthrough attributes (address, officers, psc, raw_data, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

fn non_blank(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn value_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

impl RawEntityRecord {
    pub fn new(
        legal_name: impl Into<String>,
        registry_id: impl Into<String>,
        registry_source: impl Into<String>,
    ) -> Self {
        Self {
            legal_name: legal_name.into(),
            registry_id: registry_id.into(),
            registry_source: registry_source.into(),
            country: None,
            status: None,
            company_type: None,
            jurisdiction: None,
            incorporation_date: None,
            website: None,
            trading_name: None,
            attributes: Map::new(),
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_company_type(mut self, company_type: impl Into<String>) -> Self {
        self.company_type = Some(company_type.into());
        self
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    pub fn with_incorporation_date(mut self, date: impl Into<String>) -> Self {
        self.incorporation_date = Some(date.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Whether a named field is populated, looking in typed fields first and
    /// passthrough attributes otherwise.
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "legal_name" => !self.legal_name.trim().is_empty(),
            "registry_id" => !self.registry_id.trim().is_empty(),
            "registry_source" => !self.registry_source.trim().is_empty(),
            "country" => non_blank(self.country.as_ref()),
            "status" => non_blank(self.status.as_ref()),
            "company_type" => non_blank(self.company_type.as_ref()),
            "jurisdiction" => non_blank(self.jurisdiction.as_ref()),
            "incorporation_date" => non_blank(self.incorporation_date.as_ref()),
            "website" => non_blank(self.website.as_ref()),
            "trading_name" => non_blank(self.trading_name.as_ref()),
            other => value_present(self.attributes.get(other)),
        }
    }

    /// Whether the raw scrape payload carries link references, an indirect
    /// web presence signal.
    pub fn has_link_references(&self) -> bool {
        value_present(self.attributes.get("links"))
            || value_present(self.attributes.get("raw_data").and_then(|raw| raw.get("links")))
    }

    /// Parse `incorporation_date` as `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub fn incorporated_on(&self) -> Option<NaiveDate> {
        let raw = self.incorporation_date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                raw.get(..10)
                    .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            })
    }
}

/// A record that survived every filter stage, ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdmittedEntity {
    pub record: RawEntityRecord,
    pub source: RegistrySource,
    pub status: EntityStatus,
    pub score: u8,
    pub domain_available: bool,
}

impl AdmittedEntity {
    pub fn registry_id(&self) -> &str {
        &self.record.registry_id
    }
}
