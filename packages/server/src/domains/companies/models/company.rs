use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use admission::{AdmittedEntity, RegistrySource};

/// Company - an admitted registry entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub registry_id: String,
    pub registry_source: String, // 'COMPANIES_HOUSE', 'GLEIF', 'SEC_EDGAR', 'ASIC'
    pub legal_name: String,
    pub trading_name: Option<String>,
    pub country: Option<String>,
    pub status: String, // 'Active', 'Inactive', 'Dissolved', 'Unknown'
    pub company_type: Option<String>,
    pub jurisdiction: Option<String>,
    pub incorporation_date: Option<NaiveDate>,
    pub website: Option<String>,
    pub score: i16,
    pub domain_available: bool,
    /// Source-specific fields passed through from the scraper
    pub attributes: Value,
    /// Saved rows survive stale-replace
    pub is_saved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Company {
    /// Find company by registry ID
    pub async fn find_by_registry_id(registry_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        let company =
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE registry_id = $1")
                .bind(registry_id)
                .fetch_optional(pool)
                .await?;
        Ok(company)
    }

    /// Count rows for a set of registry IDs
    pub async fn count_by_registry_ids(registry_ids: &[String], pool: &PgPool) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE registry_id = ANY($1)")
                .bind(registry_ids)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Flag a company as saved by a user
    pub async fn mark_saved(registry_id: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE companies SET is_saved = true, updated_at = NOW() WHERE registry_id = $1",
        )
        .bind(registry_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every unsaved company from a registry source (stale-replace)
    pub async fn delete_unsaved_for_source(
        source: RegistrySource,
        conn: &mut PgConnection,
    ) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM companies WHERE registry_source = $1 AND is_saved = false")
                .bind(source.as_str())
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }

    /// Insert or update an admitted entity keyed by registry_id.
    ///
    /// Updates in place on conflict and keeps the saved flag.
    pub async fn upsert(entity: &AdmittedEntity, conn: &mut PgConnection) -> Result<Self> {
        let record = &entity.record;
        let attributes = Value::Object(record.attributes.clone());

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (
                registry_id, registry_source, legal_name, trading_name, country, status,
                company_type, jurisdiction, incorporation_date, website, score,
                domain_available, attributes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (registry_id) DO UPDATE SET
                registry_source = EXCLUDED.registry_source,
                legal_name = EXCLUDED.legal_name,
                trading_name = EXCLUDED.trading_name,
                country = EXCLUDED.country,
                status = EXCLUDED.status,
                company_type = EXCLUDED.company_type,
                jurisdiction = EXCLUDED.jurisdiction,
                incorporation_date = EXCLUDED.incorporation_date,
                website = EXCLUDED.website,
                score = EXCLUDED.score,
                domain_available = EXCLUDED.domain_available,
                attributes = EXCLUDED.attributes,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&record.registry_id)
        .bind(entity.source.as_str())
        .bind(&record.legal_name)
        .bind(record.trading_name.as_deref())
        .bind(record.country.as_deref())
        .bind(entity.status.as_str())
        .bind(record.company_type.as_deref())
        .bind(record.jurisdiction.as_deref())
        .bind(record.incorporated_on())
        .bind(record.website.as_deref())
        .bind(i16::from(entity.score))
        .bind(entity.domain_available)
        .bind(attributes)
        .fetch_one(conn)
        .await?;
        Ok(company)
    }
}
