//! PostgreSQL implementation of ReportSettingsStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::domain::reporting::EmailAddress;
use crate::ports::ReportSettingsStore;

const RECIPIENT_KEY: &str = "recipient_email";

/// Stores report settings as key/value rows in `report_settings`.
pub struct PostgresReportSettingsStore {
    pool: PgPool,
}

impl PostgresReportSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores `raw` unless a recipient is already saved.
    ///
    /// Used at startup to seed the recipient from configuration without
    /// overwriting a value set through the API.
    pub async fn seed_recipient(&self, raw: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO report_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(RECIPIENT_KEY)
        .bind(raw)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to seed report recipient: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl ReportSettingsStore for PostgresReportSettingsStore {
    async fn get_recipient(&self) -> Result<Option<String>, DomainError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM report_settings WHERE key = $1")
            .bind(RECIPIENT_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to read report recipient: {}", e)))?;

        Ok(row.map(|(value,)| value))
    }

    async fn set_recipient(&self, email: &EmailAddress) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO report_settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(RECIPIENT_KEY)
        .bind(email.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save report recipient: {}", e)))?;

        Ok(())
    }
}
