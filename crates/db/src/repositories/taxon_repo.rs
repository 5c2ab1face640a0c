//! Repository for the five taxonomy rank tables.
//!
//! Every method takes the [`TaxonRank`] to operate on. Table and column
//! names come from the rank's static metadata, never from user input.

use myco_core::taxonomy::TaxonRank;
use myco_core::types::DbId;
use sqlx::PgPool;

use crate::models::taxon::{CreateTaxon, Taxon, UpdateTaxon};

/// Select list for a rank, aliasing its parent column to `parent_id`.
fn columns(rank: TaxonRank) -> String {
    let parent = match rank.parent_column() {
        Some(col) => format!("{col} AS parent_id"),
        None => "NULL::BIGINT AS parent_id".to_string(),
    };
    format!("id, name, common_name, description, {parent}, created_at, updated_at")
}

pub struct TaxonRepo;

impl TaxonRepo {
    /// List taxa of a rank ordered by name, optionally restricted to one
    /// parent. The parent filter is ignored for divisions.
    pub async fn list(
        pool: &PgPool,
        rank: TaxonRank,
        parent_id: Option<DbId>,
    ) -> Result<Vec<Taxon>, sqlx::Error> {
        let cols = columns(rank);
        let table = rank.table();
        match (rank.parent_column(), parent_id) {
            (Some(parent_col), Some(parent_id)) => {
                let query =
                    format!("SELECT {cols} FROM {table} WHERE {parent_col} = $1 ORDER BY name");
                sqlx::query_as::<_, Taxon>(&query)
                    .bind(parent_id)
                    .fetch_all(pool)
                    .await
            }
            _ => {
                let query = format!("SELECT {cols} FROM {table} ORDER BY name");
                sqlx::query_as::<_, Taxon>(&query).fetch_all(pool).await
            }
        }
    }

    pub async fn find_by_id(
        pool: &PgPool,
        rank: TaxonRank,
        id: DbId,
    ) -> Result<Option<Taxon>, sqlx::Error> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", columns(rank), rank.table());
        sqlx::query_as::<_, Taxon>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a taxon by exact name. For ranks below division the lookup is
    /// scoped to `parent_id`, matching the `(name, parent)` unique key.
    pub async fn find_by_name(
        pool: &PgPool,
        rank: TaxonRank,
        name: &str,
        parent_id: Option<DbId>,
    ) -> Result<Option<Taxon>, sqlx::Error> {
        let cols = columns(rank);
        let table = rank.table();
        match (rank.parent_column(), parent_id) {
            (Some(parent_col), Some(parent_id)) => {
                let query = format!(
                    "SELECT {cols} FROM {table} WHERE name = $1 AND {parent_col} = $2"
                );
                sqlx::query_as::<_, Taxon>(&query)
                    .bind(name)
                    .bind(parent_id)
                    .fetch_optional(pool)
                    .await
            }
            _ => {
                let query =
                    format!("SELECT {cols} FROM {table} WHERE name = $1 ORDER BY id LIMIT 1");
                sqlx::query_as::<_, Taxon>(&query)
                    .bind(name)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    /// Insert a taxon. `parent_id` is ignored for divisions; for other ranks
    /// a missing parent surfaces as a NOT NULL violation.
    pub async fn create(
        pool: &PgPool,
        rank: TaxonRank,
        input: &CreateTaxon,
    ) -> Result<Taxon, sqlx::Error> {
        let cols = columns(rank);
        let table = rank.table();
        match rank.parent_column() {
            Some(parent_col) => {
                let query = format!(
                    "INSERT INTO {table} (name, common_name, description, {parent_col})
                     VALUES ($1, $2, $3, $4)
                     RETURNING {cols}"
                );
                sqlx::query_as::<_, Taxon>(&query)
                    .bind(&input.name)
                    .bind(&input.common_name)
                    .bind(&input.description)
                    .bind(input.parent_id)
                    .fetch_one(pool)
                    .await
            }
            None => {
                let query = format!(
                    "INSERT INTO {table} (name, common_name, description)
                     VALUES ($1, $2, $3)
                     RETURNING {cols}"
                );
                sqlx::query_as::<_, Taxon>(&query)
                    .bind(&input.name)
                    .bind(&input.common_name)
                    .bind(&input.description)
                    .fetch_one(pool)
                    .await
            }
        }
    }

    /// Apply the non-`None` fields of `input`. Returns `None` if the row
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        rank: TaxonRank,
        id: DbId,
        input: &UpdateTaxon,
    ) -> Result<Option<Taxon>, sqlx::Error> {
        let cols = columns(rank);
        let table = rank.table();
        let parent_assignment = match rank.parent_column() {
            Some(parent_col) => format!(", {parent_col} = COALESCE($5, {parent_col})"),
            None => String::new(),
        };
        let query = format!(
            "UPDATE {table} SET
                name = COALESCE($2, name),
                common_name = COALESCE($3, common_name),
                description = COALESCE($4, description){parent_assignment}
             WHERE id = $1
             RETURNING {cols}"
        );
        let mut q = sqlx::query_as::<_, Taxon>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.common_name)
            .bind(&input.description);
        if rank.parent_column().is_some() {
            q = q.bind(input.parent_id);
        }
        q.fetch_optional(pool).await
    }

    /// Delete a taxon. Children still referencing it make this fail with a
    /// foreign key violation.
    pub async fn delete(pool: &PgPool, rank: TaxonRank, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", rank.table());
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fill in a missing common name and move the taxon under `parent_id`.
    ///
    /// A taxon that already has a non-empty common name is left untouched,
    /// parent included. Returns `true` only when something actually changed.
    pub async fn assign_common_name(
        pool: &PgPool,
        rank: TaxonRank,
        id: DbId,
        common_name: Option<&str>,
        parent_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let common_name = common_name.filter(|n| !n.is_empty());
        let name_missing = "(common_name IS NULL OR common_name = '')";

        let result = match rank.parent_column() {
            Some(parent_col) => {
                let query = format!(
                    "UPDATE {table} SET
                        common_name = COALESCE($2, common_name),
                        {parent_col} = COALESCE($3, {parent_col})
                     WHERE id = $1 AND {name_missing}
                       AND ($2::TEXT IS NOT NULL
                            OR ($3::BIGINT IS NOT NULL AND {parent_col} <> $3))",
                    table = rank.table(),
                );
                sqlx::query(&query)
                    .bind(id)
                    .bind(common_name)
                    .bind(parent_id)
                    .execute(pool)
                    .await?
            }
            None => {
                let query = format!(
                    "UPDATE {table} SET common_name = $2
                     WHERE id = $1 AND {name_missing} AND $2::TEXT IS NOT NULL",
                    table = rank.table(),
                );
                sqlx::query(&query)
                    .bind(id)
                    .bind(common_name)
                    .execute(pool)
                    .await?
            }
        };
        Ok(result.rows_affected() > 0)
    }
}
