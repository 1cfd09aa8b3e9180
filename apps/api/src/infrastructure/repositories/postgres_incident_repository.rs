use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::incident::{Incident, IncidentChanges, NewIncident};
use crate::domain::repositories::{IncidentRepository, RepositoryError, RepositoryResult};

/// PostgreSQL implementation of IncidentRepository
///
/// Uses runtime-checked `query_as` so the crate builds without a live
/// database or an offline query cache.
pub struct PostgresIncidentRepository {
    pool: PgPool,
}

impl PostgresIncidentRepository {
    /// Creates a new PostgresIncidentRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IncidentRow {
    id: i32,
    title: String,
    description: String,
    severity: String,
    bank: String,
    date: DateTime<Utc>,
    image_url: Option<String>,
    created_by: Option<i32>,
}

impl TryFrom<IncidentRow> for Incident {
    type Error = RepositoryError;

    fn try_from(row: IncidentRow) -> Result<Self, Self::Error> {
        let severity = row
            .severity
            .parse()
            .map_err(|e| RepositoryError::Corrupt(format!("incident {}: {}", row.id, e)))?;

        Ok(Incident {
            id: row.id,
            title: row.title,
            description: row.description,
            severity,
            bank: row.bank,
            created_at: row.date,
            image_url: row.image_url,
            created_by: row.created_by,
        })
    }
}

fn into_incidents(rows: Vec<IncidentRow>) -> RepositoryResult<Vec<Incident>> {
    rows.into_iter().map(Incident::try_from).collect()
}

#[async_trait]
impl IncidentRepository for PostgresIncidentRepository {
    async fn list(&self) -> RepositoryResult<Vec<Incident>> {
        let rows = sqlx::query_as::<_, IncidentRow>(
            r#"
            SELECT id, title, description, severity, bank, date, image_url, created_by
            FROM incidents
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        into_incidents(rows)
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Incident>> {
        sqlx::query_as::<_, IncidentRow>(
            r#"
            SELECT id, title, description, severity, bank, date, image_url, created_by
            FROM incidents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Incident::try_from)
        .transpose()
    }

    async fn create(&self, incident: NewIncident) -> RepositoryResult<Incident> {
        let row = sqlx::query_as::<_, IncidentRow>(
            r#"
            INSERT INTO incidents (title, description, severity, bank, image_url, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, severity, bank, date, image_url, created_by
            "#,
        )
        .bind(incident.title.as_str())
        .bind(&incident.description)
        .bind(incident.severity.as_str())
        .bind(&incident.bank)
        .bind(&incident.image_url)
        .bind(incident.created_by)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn update(
        &self,
        id: i32,
        changes: IncidentChanges,
    ) -> RepositoryResult<Option<Incident>> {
        // NULL parameters keep the stored value
        sqlx::query_as::<_, IncidentRow>(
            r#"
            UPDATE incidents SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                severity = COALESCE($4, severity),
                bank = COALESCE($5, bank),
                image_url = COALESCE($6, image_url)
            WHERE id = $1
            RETURNING id, title, description, severity, bank, date, image_url, created_by
            "#,
        )
        .bind(id)
        .bind(changes.title.as_ref().map(|t| t.as_str()))
        .bind(changes.description.as_deref())
        .bind(changes.severity.map(|s| s.as_str()))
        .bind(changes.bank.as_deref())
        .bind(changes.image_url.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .map(Incident::try_from)
        .transpose()
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM incidents WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
