//! Repository for the `findings` table.

use myco_core::pagination::PageRequest;
use myco_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::finding::{
    CreateFinding, Finding, FindingDetail, FindingFilter, MapPoint, OrphanedFinding,
    UpdateFinding,
};

const COLUMNS: &str = "id, user_id, species_id, found_at, latitude, longitude, location, \
                       notes, quantity, weather, temperature, photo_url, is_public, \
                       created_at, updated_at";

const DETAIL_SELECT: &str = "\
    fi.id, fi.user_id, fi.species_id, fi.found_at, fi.latitude, fi.longitude, fi.location, \
    fi.notes, fi.quantity, fi.weather, fi.temperature, fi.photo_url, fi.is_public, \
    fi.created_at, fi.updated_at, \
    s.scientific_name, s.common_name AS species_common_name, \
    s.common_name_de AS species_common_name_de, s.edibility, \
    g.name AS genus_name, u.username";

const DETAIL_JOINS: &str = "\
    FROM findings fi \
    JOIN species s ON s.id = fi.species_id \
    JOIN genera g ON g.id = s.genus_id \
    JOIN users u ON u.id = fi.user_id";

fn filter_clause(filter: &FindingFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.user_id.is_some() {
        conditions.push(format!("fi.user_id = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.species_id.is_some() {
        conditions.push(format!("fi.species_id = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.start_date.is_some() {
        conditions.push(format!("fi.found_at >= ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.end_date.is_some() {
        conditions.push(format!("fi.found_at <= ${bind_idx}"));
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (where_clause, bind_idx)
}

fn bind_filter<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &FindingFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    if let Some(user_id) = filter.user_id {
        query = query.bind(user_id);
    }
    if let Some(species_id) = filter.species_id {
        query = query.bind(species_id);
    }
    if let Some(start) = filter.start_date {
        query = query.bind(start);
    }
    if let Some(end) = filter.end_date {
        query = query.bind(end);
    }
    query
}

pub struct FindingRepo;

impl FindingRepo {
    /// One page of findings matching `filter`, newest first, with the total
    /// number of matches.
    pub async fn list(
        pool: &PgPool,
        filter: &FindingFilter,
        page: &PageRequest,
    ) -> Result<(Vec<FindingDetail>, i64), sqlx::Error> {
        let (where_clause, bind_idx) = filter_clause(filter);

        let count_query = format!("SELECT COUNT(*) {DETAIL_JOINS} {where_clause}");
        let (total,) = bind_filter(sqlx::query_as::<_, (i64,)>(&count_query), filter)
            .fetch_one(pool)
            .await?;

        let limit_idx = bind_idx;
        let offset_idx = bind_idx + 1;
        let query = format!(
            "SELECT {DETAIL_SELECT} {DETAIL_JOINS} {where_clause} \
             ORDER BY fi.found_at DESC, fi.id DESC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );
        let rows = bind_filter(sqlx::query_as::<_, FindingDetail>(&query), filter)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FindingDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_SELECT} {DETAIL_JOINS} WHERE fi.id = $1");
        sqlx::query_as::<_, FindingDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a finding owned by `user_id`. `found_at` defaults to now and
    /// `quantity` to 1.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateFinding,
    ) -> Result<Finding, sqlx::Error> {
        let query = format!(
            "INSERT INTO findings (
                user_id, species_id, found_at, latitude, longitude, location, notes,
                quantity, weather, temperature, photo_url, is_public
             ) VALUES (
                $1, $2, COALESCE($3, NOW()), $4, $5, $6, $7,
                COALESCE($8, 1), $9, $10, $11, COALESCE($12, FALSE)
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Finding>(&query)
            .bind(user_id)
            .bind(input.species_id)
            .bind(input.found_at)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.location)
            .bind(&input.notes)
            .bind(input.quantity)
            .bind(&input.weather)
            .bind(input.temperature)
            .bind(&input.photo_url)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFinding,
    ) -> Result<Option<Finding>, sqlx::Error> {
        let query = format!(
            "UPDATE findings SET
                species_id = COALESCE($2, species_id),
                found_at = COALESCE($3, found_at),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                location = COALESCE($6, location),
                notes = COALESCE($7, notes),
                quantity = COALESCE($8, quantity),
                weather = COALESCE($9, weather),
                temperature = COALESCE($10, temperature),
                photo_url = COALESCE($11, photo_url),
                is_public = COALESCE($12, is_public)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Finding>(&query)
            .bind(id)
            .bind(input.species_id)
            .bind(input.found_at)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.location)
            .bind(&input.notes)
            .bind(input.quantity)
            .bind(&input.weather)
            .bind(input.temperature)
            .bind(&input.photo_url)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM findings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM findings")
            .fetch_one(pool)
            .await
    }

    /// Points for the map, newest first. `user_id` restricts to one owner.
    pub async fn map_points(
        pool: &PgPool,
        user_id: Option<DbId>,
    ) -> Result<Vec<MapPoint>, sqlx::Error> {
        sqlx::query_as::<_, MapPoint>(
            "SELECT fi.id, fi.latitude, fi.longitude, fi.found_at, fi.location,
                    s.id AS species_id, s.scientific_name, s.common_name, s.edibility
             FROM findings fi
             JOIN species s ON s.id = fi.species_id
             WHERE $1::BIGINT IS NULL OR fi.user_id = $1
             ORDER BY fi.found_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Findings pointing at a species id with no matching row.
    pub async fn list_orphaned(pool: &PgPool) -> Result<Vec<OrphanedFinding>, sqlx::Error> {
        sqlx::query_as::<_, OrphanedFinding>(
            "SELECT fi.id, fi.user_id, fi.species_id, fi.found_at, u.username
             FROM findings fi
             LEFT JOIN species s ON s.id = fi.species_id
             LEFT JOIN users u ON u.id = fi.user_id
             WHERE s.id IS NULL
             ORDER BY fi.id",
        )
        .fetch_all(pool)
        .await
    }
}
