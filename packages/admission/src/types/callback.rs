//! Inbound scraper callback body.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::job::JobStatus;
use super::record::RawEntityRecord;
use crate::error::ValidationError;

/// Maximum entities a single callback may carry.
pub const MAX_CALLBACK_ENTITIES: usize = 1000;

/// Maximum length of a scraper-reported error message.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 2000;

/// Body posted by a registry scraper when a job changes state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(default)]
    pub entities: Option<Vec<RawEntityRecord>>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl CallbackPayload {
    pub fn new(job_id: Uuid, status: JobStatus) -> Self {
        Self {
            job_id,
            status,
            entities: None,
            total_count: None,
            error_message: None,
        }
    }

    pub fn with_entities(mut self, entities: Vec<RawEntityRecord>) -> Self {
        self.total_count = Some(entities.len() as u64);
        self.entities = Some(entities);
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Parse and validate a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        let payload: CallbackPayload = serde_json::from_slice(body)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        payload.validate()?;
        Ok(payload)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let entities = self.entities.as_deref().unwrap_or_default();
        if entities.len() > MAX_CALLBACK_ENTITIES {
            return Err(ValidationError::TooManyEntities {
                count: entities.len(),
                max: MAX_CALLBACK_ENTITIES,
            });
        }

        if let Some(message) = &self.error_message {
            let len = message.chars().count();
            if len > MAX_ERROR_MESSAGE_CHARS {
                return Err(ValidationError::ErrorMessageTooLong {
                    len,
                    max: MAX_ERROR_MESSAGE_CHARS,
                });
            }
        }

        for (index, entity) in entities.iter().enumerate() {
            if entity.legal_name.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    index,
                    field: "legal_name",
                });
            }
            if entity.registry_id.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    index,
                    field: "registry_id",
                });
            }
        }

        Ok(())
    }

    pub fn entities(&self) -> &[RawEntityRecord] {
        self.entities.as_deref().unwrap_or_default()
    }
}
