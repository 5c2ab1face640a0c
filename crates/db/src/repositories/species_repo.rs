//! Repository for the `species` catalogue.

use myco_core::pagination::PageRequest;
use myco_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::species::{
    CreateSpecies, Species, SpeciesFilter, SpeciesWithLineage, UpdateSpecies,
};

const COLUMNS: &str = "id, scientific_name, common_name, common_name_de, common_name_fr, \
                       common_name_it, synonyms, description, habitat, edibility, toxicity, \
                       season_start, season_end, cap_shape, cap_color, gill_attachment, \
                       spore_print_color, occurrence, image_url, genus_id, created_at, updated_at";

/// Same columns as [`COLUMNS`], qualified with the `s` alias, plus the
/// lineage joined from every rank above the species.
const LINEAGE_SELECT: &str = "\
    s.id, s.scientific_name, s.common_name, s.common_name_de, s.common_name_fr, \
    s.common_name_it, s.synonyms, s.description, s.habitat, s.edibility, s.toxicity, \
    s.season_start, s.season_end, s.cap_shape, s.cap_color, s.gill_attachment, \
    s.spore_print_color, s.occurrence, s.image_url, s.genus_id, s.created_at, s.updated_at, \
    g.name AS genus_name, g.common_name AS genus_common_name, \
    f.id AS family_id, f.name AS family_name, \
    o.id AS order_id, o.name AS order_name, \
    c.id AS class_id, c.name AS class_name, \
    d.id AS division_id, d.name AS division_name";

const LINEAGE_JOINS: &str = "\
    FROM species s \
    JOIN genera g ON g.id = s.genus_id \
    JOIN families f ON f.id = g.family_id \
    JOIN orders o ON o.id = f.order_id \
    JOIN classes c ON c.id = o.class_id \
    JOIN divisions d ON d.id = c.division_id";

/// Build the `WHERE` clause for a filter. Placeholders are numbered in the
/// same order [`bind_filter`] binds values.
fn filter_clause(filter: &SpeciesFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if filter.search.is_some() {
        conditions.push(format!(
            "(s.scientific_name ILIKE ${bind_idx} OR s.common_name ILIKE ${bind_idx} \
              OR s.common_name_de ILIKE ${bind_idx} OR s.common_name_fr ILIKE ${bind_idx} \
              OR s.common_name_it ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
    }
    if filter.edibility.is_some() {
        conditions.push(format!("s.edibility = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.occurrence.is_some() {
        conditions.push(format!("s.occurrence = ${bind_idx}"));
        bind_idx += 1;
    }
    for (value, column) in [
        (filter.genus_id, "s.genus_id"),
        (filter.family_id, "f.id"),
        (filter.order_id, "o.id"),
        (filter.class_id, "c.id"),
        (filter.division_id, "d.id"),
    ] {
        if value.is_some() {
            conditions.push(format!("{column} = ${bind_idx}"));
            bind_idx += 1;
        }
    }
    if filter.season.is_some() {
        // Seasons with start > end wrap across the new year.
        conditions.push(format!(
            "(s.season_start IS NOT NULL AND s.season_end IS NOT NULL AND \
              CASE WHEN s.season_start <= s.season_end \
                   THEN ${bind_idx} BETWEEN s.season_start AND s.season_end \
                   ELSE ${bind_idx} >= s.season_start OR ${bind_idx} <= s.season_end END)"
        ));
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
    filter: &SpeciesFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    if let Some(search) = &filter.search {
        query = query.bind(format!("%{search}%"));
    }
    if let Some(edibility) = &filter.edibility {
        query = query.bind(edibility.clone());
    }
    if let Some(occurrence) = &filter.occurrence {
        query = query.bind(occurrence.clone());
    }
    for id in [
        filter.genus_id,
        filter.family_id,
        filter.order_id,
        filter.class_id,
        filter.division_id,
    ]
    .into_iter()
    .flatten()
    {
        query = query.bind(id);
    }
    if let Some(month) = filter.season {
        query = query.bind(month);
    }
    query
}

pub struct SpeciesRepo;

impl SpeciesRepo {
    /// One page of species matching `filter`, ordered by scientific name,
    /// together with the total number of matches.
    pub async fn list(
        pool: &PgPool,
        filter: &SpeciesFilter,
        page: &PageRequest,
    ) -> Result<(Vec<SpeciesWithLineage>, i64), sqlx::Error> {
        let (where_clause, bind_idx) = filter_clause(filter);

        let count_query =
            format!("SELECT COUNT(DISTINCT s.id) {LINEAGE_JOINS} {where_clause}");
        let (total,) = bind_filter(sqlx::query_as::<_, (i64,)>(&count_query), filter)
            .fetch_one(pool)
            .await?;

        let limit_idx = bind_idx;
        let offset_idx = bind_idx + 1;
        let query = format!(
            "SELECT {LINEAGE_SELECT} {LINEAGE_JOINS} {where_clause} \
             ORDER BY s.scientific_name \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );
        let rows = bind_filter(sqlx::query_as::<_, SpeciesWithLineage>(&query), filter)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SpeciesWithLineage>, sqlx::Error> {
        let query = format!("SELECT {LINEAGE_SELECT} {LINEAGE_JOINS} WHERE s.id = $1");
        sqlx::query_as::<_, SpeciesWithLineage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_scientific_name(
        pool: &PgPool,
        scientific_name: &str,
    ) -> Result<Option<Species>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM species WHERE scientific_name = $1");
        sqlx::query_as::<_, Species>(&query)
            .bind(scientific_name)
            .fetch_optional(pool)
            .await
    }

    /// Insert a species. Absent `edibility`/`occurrence` take the column
    /// defaults.
    pub async fn create(pool: &PgPool, input: &CreateSpecies) -> Result<Species, sqlx::Error> {
        let query = format!(
            "INSERT INTO species (
                scientific_name, genus_id, common_name, common_name_de, common_name_fr,
                common_name_it, synonyms, description, habitat, edibility, toxicity,
                season_start, season_end, cap_shape, cap_color, gill_attachment,
                spore_print_color, occurrence, image_url
             ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'unknown'), $11,
                $12, $13, $14, $15, $16, $17, COALESCE($18, 'occasional'), $19
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Species>(&query)
            .bind(&input.scientific_name)
            .bind(input.genus_id)
            .bind(&input.common_name)
            .bind(&input.common_name_de)
            .bind(&input.common_name_fr)
            .bind(&input.common_name_it)
            .bind(&input.synonyms)
            .bind(&input.description)
            .bind(&input.habitat)
            .bind(&input.edibility)
            .bind(&input.toxicity)
            .bind(input.season_start)
            .bind(input.season_end)
            .bind(&input.cap_shape)
            .bind(&input.cap_color)
            .bind(&input.gill_attachment)
            .bind(&input.spore_print_color)
            .bind(&input.occurrence)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`. Returns `None` if the row
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSpecies,
    ) -> Result<Option<Species>, sqlx::Error> {
        let query = format!(
            "UPDATE species SET
                scientific_name = COALESCE($2, scientific_name),
                genus_id = COALESCE($3, genus_id),
                common_name = COALESCE($4, common_name),
                common_name_de = COALESCE($5, common_name_de),
                common_name_fr = COALESCE($6, common_name_fr),
                common_name_it = COALESCE($7, common_name_it),
                synonyms = COALESCE($8, synonyms),
                description = COALESCE($9, description),
                habitat = COALESCE($10, habitat),
                edibility = COALESCE($11, edibility),
                toxicity = COALESCE($12, toxicity),
                season_start = COALESCE($13, season_start),
                season_end = COALESCE($14, season_end),
                cap_shape = COALESCE($15, cap_shape),
                cap_color = COALESCE($16, cap_color),
                gill_attachment = COALESCE($17, gill_attachment),
                spore_print_color = COALESCE($18, spore_print_color),
                occurrence = COALESCE($19, occurrence),
                image_url = COALESCE($20, image_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Species>(&query)
            .bind(id)
            .bind(&input.scientific_name)
            .bind(input.genus_id)
            .bind(&input.common_name)
            .bind(&input.common_name_de)
            .bind(&input.common_name_fr)
            .bind(&input.common_name_it)
            .bind(&input.synonyms)
            .bind(&input.description)
            .bind(&input.habitat)
            .bind(&input.edibility)
            .bind(&input.toxicity)
            .bind(input.season_start)
            .bind(input.season_end)
            .bind(&input.cap_shape)
            .bind(&input.cap_color)
            .bind(&input.gill_attachment)
            .bind(&input.spore_print_color)
            .bind(&input.occurrence)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a species. Fails with a foreign key violation while findings
    /// still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM species WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM species")
            .fetch_one(pool)
            .await
    }

    /// Up to `limit` species ids in random order.
    pub async fn random_sample(pool: &PgPool, limit: i64) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM species ORDER BY RANDOM() LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Remove every species and taxon, bottom-up, in one transaction.
    ///
    /// Fails with a foreign key violation if any finding exists.
    pub async fn clear_catalog(pool: &PgPool) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for table in ["species", "genera", "families", "orders", "classes", "divisions"] {
            let deleted = sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(table, deleted, "Cleared catalogue table");
        }
        tx.commit().await
    }
}
