//! Authoritative company registry search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::types::record::EntityStatus;

/// One company returned by a registry name search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryMatch {
    pub name: String,
    pub company_number: Option<String>,
    pub jurisdiction: Option<String>,
    pub status: Option<String>,
}

impl RegistryMatch {
    pub fn new(name: impl Into<String>, status: Option<&str>) -> Self {
        Self {
            name: name.into(),
            company_number: None,
            jurisdiction: None,
            status: status.map(str::to_string),
        }
    }

    pub fn is_active(&self) -> bool {
        EntityStatus::normalize(self.status.as_deref()) == EntityStatus::Active
    }
}

#[async_trait]
pub trait CompanyRegistry: Send + Sync {
    /// Short identifier reported alongside verification results (e.g. "opencorporates").
    fn source(&self) -> &str;

    async fn search(&self, name: &str) -> ClientResult<Vec<RegistryMatch>>;
}
