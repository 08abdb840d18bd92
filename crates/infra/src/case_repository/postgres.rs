//! Postgres-backed case repository.
//!
//! One row per case. Sides, arguments and the verdict live in JSONB columns;
//! side party ids are duplicated into plain UUID columns for listing queries.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `AlreadyExists` |
//! | Database (other) | Any other | `Storage` |
//! | PoolClosed / network / decode | N/A | `Storage` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use arbitra_core::{AggregateRoot, CaseId, ExpectedVersion, PartyId};
use arbitra_hearing::{Argument, Case, CaseDetails, CaseRecord, CaseStatus, PartyRef, Verdict};

use super::r#trait::{CaseRepository, RepositoryError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cases (
    id            UUID PRIMARY KEY,
    title         TEXT NOT NULL,
    description   TEXT NOT NULL,
    category      TEXT NOT NULL,
    jurisdiction  TEXT NOT NULL,
    status        TEXT NOT NULL,
    side_a        JSONB,
    side_a_party  UUID,
    side_b        JSONB,
    side_b_party  UUID,
    arguments     JSONB NOT NULL DEFAULT '[]'::jsonb,
    verdict       JSONB,
    version       BIGINT NOT NULL CHECK (version > 0),
    created_at    TIMESTAMPTZ NOT NULL,
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS cases_side_a_party_idx ON cases (side_a_party);
CREATE INDEX IF NOT EXISTS cases_side_b_party_idx ON cases (side_b_party);
CREATE INDEX IF NOT EXISTS cases_open_idx ON cases (created_at DESC) WHERE side_b_party IS NULL;
"#;

const SELECT_COLUMNS: &str = r#"
    id, title, description, category, jurisdiction, status,
    side_a, side_b, arguments, verdict, version, created_at
"#;

/// Postgres case repository.
///
/// `update` is a single conditional `UPDATE … WHERE id = $1 AND version = $n`,
/// so two writers that decided against the same version cannot both commit.
#[derive(Debug, Clone)]
pub struct PostgresCaseRepository {
    pool: Arc<PgPool>,
}

impl PostgresCaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and bootstrap the schema.
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;
        Ok(repo)
    }

    /// Create the `cases` table and its indexes if missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn fetch_many(
        &self,
        operation: &str,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<Case>, RepositoryError> {
        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;

        rows.iter().map(case_from_row).collect()
    }
}

#[async_trait]
impl CaseRepository for PostgresCaseRepository {
    #[instrument(skip(self, case), fields(case_id = %case.id_typed()), err)]
    async fn insert(&self, case: &Case) -> Result<(), RepositoryError> {
        let record = case.to_record();

        sqlx::query(
            r#"
            INSERT INTO cases (
                id, title, description, category, jurisdiction, status,
                side_a, side_a_party, side_b, side_b_party,
                arguments, verdict, version, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.details.title)
        .bind(&record.details.description)
        .bind(&record.details.category)
        .bind(&record.details.jurisdiction)
        .bind(record.status.as_str())
        .bind(record.side_a.as_ref().map(Json))
        .bind(record.side_a.as_ref().map(|p| *p.party_id.as_uuid()))
        .bind(record.side_b.as_ref().map(Json))
        .bind(record.side_b.as_ref().map(|p| *p.party_id.as_uuid()))
        .bind(Json(&record.arguments))
        .bind(record.verdict.as_ref().map(Json))
        .bind(record.version as i64)
        .bind(record.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::AlreadyExists
            } else {
                map_sqlx_error("insert_case", e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(case_id = %id), err)]
    async fn get(&self, id: CaseId) -> Result<Option<Case>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM cases WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_case", e))?;

        row.as_ref().map(case_from_row).transpose()
    }

    #[instrument(
        skip(self, case),
        fields(case_id = %case.id_typed(), version = case.version(), expected = ?expected),
        err
    )]
    async fn update(&self, case: &Case, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let record = case.to_record();
        let expected_version = match expected {
            ExpectedVersion::Any => None,
            ExpectedVersion::Exact(v) => Some(v as i64),
        };

        let result = sqlx::query(
            r#"
            UPDATE cases SET
                status = $2,
                side_a = $3,
                side_a_party = $4,
                side_b = $5,
                side_b_party = $6,
                arguments = $7,
                verdict = $8,
                version = $9,
                updated_at = NOW()
            WHERE id = $1 AND ($10::BIGINT IS NULL OR version = $10)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.status.as_str())
        .bind(record.side_a.as_ref().map(Json))
        .bind(record.side_a.as_ref().map(|p| *p.party_id.as_uuid()))
        .bind(record.side_b.as_ref().map(Json))
        .bind(record.side_b.as_ref().map(|p| *p.party_id.as_uuid()))
        .bind(Json(&record.arguments))
        .bind(record.verdict.as_ref().map(Json))
        .bind(record.version as i64)
        .bind(expected_version)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_case", e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Nothing matched: tell a missing row apart from a stale version.
        let current: Option<i64> = sqlx::query_scalar("SELECT version FROM cases WHERE id = $1")
            .bind(record.id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_case_probe", e))?;

        match current {
            None => Err(RepositoryError::NotFound),
            Some(found) => Err(RepositoryError::Conflict(format!(
                "expected {expected:?}, found {found}"
            ))),
        }
    }

    #[instrument(skip(self), fields(party_id = %party), err)]
    async fn list_for_party(&self, party: PartyId) -> Result<Vec<Case>, RepositoryError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM cases \
             WHERE side_a_party = $1 OR side_b_party = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        self.fetch_many("list_for_party", sqlx::query(&sql).bind(party.as_uuid()))
            .await
    }

    #[instrument(skip(self), err)]
    async fn list_open(&self) -> Result<Vec<Case>, RepositoryError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM cases \
             WHERE side_b_party IS NULL AND status <> 'closed' \
             ORDER BY created_at DESC, id DESC"
        );
        self.fetch_many("list_open", sqlx::query(&sql)).await
    }
}

fn case_from_row(row: &sqlx::postgres::PgRow) -> Result<Case, RepositoryError> {
    let decode =
        |e: sqlx::Error| RepositoryError::Storage(format!("failed to decode case row: {e}"));

    let status: String = row.try_get("status").map_err(decode)?;
    let status: CaseStatus = status
        .parse()
        .map_err(|e| RepositoryError::Storage(format!("stored status: {e}")))?;

    let side_a: Option<Json<PartyRef>> = row.try_get("side_a").map_err(decode)?;
    let side_b: Option<Json<PartyRef>> = row.try_get("side_b").map_err(decode)?;
    let arguments: Json<Vec<Argument>> = row.try_get("arguments").map_err(decode)?;
    let verdict: Option<Json<Verdict>> = row.try_get("verdict").map_err(decode)?;
    let version: i64 = row.try_get("version").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;

    Ok(Case::from_record(CaseRecord {
        id: CaseId::from_uuid(id),
        details: CaseDetails {
            title: row.try_get("title").map_err(decode)?,
            description: row.try_get("description").map_err(decode)?,
            category: row.try_get("category").map_err(decode)?,
            jurisdiction: row.try_get("jurisdiction").map_err(decode)?,
        },
        created_at,
        status,
        side_a: side_a.map(|j| j.0),
        side_b: side_b.map(|j| j.0),
        arguments: arguments.0,
        verdict: verdict.map(|j| j.0),
        version: version as u64,
    }))
}

/// Map SQLx errors to `RepositoryError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => RepositoryError::Storage(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed during {operation}"))
        }
        other => RepositoryError::Storage(format!("{operation} failed: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
