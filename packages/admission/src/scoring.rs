//! Quality score for admitted entities.
//!
//! Pure and deterministic: the reference date is passed in so the same
//! record always scores the same.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::record::{EntityStatus, RawEntityRecord};

/// Fields counted towards completeness.
pub const COMPLETENESS_FIELDS: [&str; 11] = [
    "legal_name",
    "registry_id",
    "country",
    "status",
    "incorporation_date",
    "company_type",
    "jurisdiction",
    "address",
    "website",
    "officers",
    "psc",
];

const COMPLETENESS_WEIGHT: f64 = 40.0;

/// Component scores before summing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0.0 to 40.0
    pub completeness: f64,
    /// 0 to 25
    pub status: u8,
    /// 0 to 20
    pub web_presence: u8,
    /// 0 to 15
    pub age: u8,
}

impl ScoreBreakdown {
    pub fn compute(record: &RawEntityRecord, status: EntityStatus, as_of: NaiveDate) -> Self {
        Self {
            completeness: completeness(record),
            status: status_points(status),
            web_presence: web_presence_points(record),
            age: age_points(record.incorporated_on(), as_of),
        }
    }

    /// Sum of components, rounded and clamped to 0..=100.
    pub fn total(&self) -> u8 {
        let sum = self.completeness
            + f64::from(self.status)
            + f64::from(self.web_presence)
            + f64::from(self.age);
        sum.round().clamp(0.0, 100.0) as u8
    }
}

/// Score an entity as of `as_of`.
pub fn score(record: &RawEntityRecord, status: EntityStatus, as_of: NaiveDate) -> u8 {
    ScoreBreakdown::compute(record, status, as_of).total()
}

fn completeness(record: &RawEntityRecord) -> f64 {
    let present = COMPLETENESS_FIELDS
        .iter()
        .filter(|field| record.has_field(field))
        .count();
    present as f64 / COMPLETENESS_FIELDS.len() as f64 * COMPLETENESS_WEIGHT
}

fn status_points(status: EntityStatus) -> u8 {
    match status {
        EntityStatus::Active => 25,
        EntityStatus::Inactive => 10,
        EntityStatus::Dissolved => 0,
        EntityStatus::Unknown => 5,
    }
}

fn web_presence_points(record: &RawEntityRecord) -> u8 {
    if record.has_field("website") {
        20
    } else if record.has_link_references() {
        10
    } else {
        0
    }
}

fn age_points(incorporated: Option<NaiveDate>, as_of: NaiveDate) -> u8 {
    let Some(incorporated) = incorporated else {
        return 0;
    };
    let years = (as_of - incorporated).num_days() as f64 / 365.25;
    if years < 2.0 {
        15
    } else if years < 5.0 {
        10
    } else if years < 10.0 {
        5
    } else {
        0
    }
}
