//! `myco import-species`: load the species checklist into the database.
//!
//! Each accepted row is reconciled top-down through the five taxonomy
//! ranks. A rank is resolved from the run cache first, then looked up by
//! `(name, parent)`, and only inserted when both miss. Genera are matched by
//! name alone so an existing genus can receive its German name and be moved
//! under the family the checklist names.

use std::io::Read;

use anyhow::{bail, Context};
use myco_core::species_import::{parse_row, ImportReport, ImportRow, TaxonCache, DELIMITER};
use myco_core::taxonomy::TaxonRank;
use myco_core::types::DbId;
use myco_db::models::species::CreateSpecies;
use myco_db::models::taxon::CreateTaxon;
use myco_db::repositories::{FindingRepo, SpeciesRepo, TaxonRepo};
use myco_db::DbPool;

use crate::cli::ImportSpeciesArgs;

/// Read checklist records, dropping the first `skip_lines` of them.
///
/// Fields that are not valid UTF-8 are decoded lossily.
pub fn read_records<R: Read>(reader: R, skip_lines: usize) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    reader
        .byte_records()
        .skip(skip_lines)
        .map(|record| {
            record.map(|r| {
                r.iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect()
            })
        })
        .collect()
}

/// Delete every species and taxon. Refused while findings exist.
pub async fn clear_catalog(pool: &DbPool) -> anyhow::Result<()> {
    let findings = FindingRepo::count(pool).await?;
    if findings > 0 {
        bail!("refusing to clear the catalogue: {findings} findings still reference species");
    }
    SpeciesRepo::clear_catalog(pool)
        .await
        .context("failed to clear the catalogue")?;
    tracing::info!("Cleared species and taxonomy tables");
    Ok(())
}

/// Reconciles checklist rows against the database, one row at a time.
pub struct SpeciesImporter<'a> {
    pool: &'a DbPool,
    cache: TaxonCache,
    report: ImportReport,
}

impl<'a> SpeciesImporter<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self {
            pool,
            cache: TaxonCache::new(),
            report: ImportReport::default(),
        }
    }

    /// Import one raw record. Skips and database errors are counted, never
    /// propagated.
    pub async fn import_record<S: AsRef<str>>(&mut self, fields: &[S]) {
        self.report.rows_read += 1;

        let row = match parse_row(fields) {
            Ok(row) => row,
            Err(reason) => {
                tracing::debug!(row = self.report.rows_read, %reason, "Row skipped");
                self.report.record_skip(reason);
                return;
            }
        };

        if let Err(e) = self.import_row(&row).await {
            self.report.rows_failed += 1;
            tracing::warn!(
                row = self.report.rows_read,
                scientific_name = %row.scientific_name,
                error = %e,
                "Failed to import row"
            );
        }
    }

    pub fn report(&self) -> &ImportReport {
        &self.report
    }

    pub fn cache(&self) -> &TaxonCache {
        &self.cache
    }

    pub fn into_report(self) -> ImportReport {
        self.report
    }

    async fn import_row(&mut self, row: &ImportRow) -> Result<(), sqlx::Error> {
        let mut parent = None;
        for rank in [
            TaxonRank::Division,
            TaxonRank::Class,
            TaxonRank::Order,
            TaxonRank::Family,
        ] {
            parent = Some(self.resolve_taxon(rank, row.taxon_name(rank), parent).await?);
        }
        let genus_id = self.resolve_genus(row, parent).await?;

        if SpeciesRepo::find_by_scientific_name(self.pool, &row.scientific_name)
            .await?
            .is_some()
        {
            self.report.species_duplicate += 1;
            tracing::debug!(scientific_name = %row.scientific_name, "Species already present");
            return Ok(());
        }

        let species = SpeciesRepo::create(
            self.pool,
            &CreateSpecies {
                scientific_name: row.scientific_name.clone(),
                genus_id,
                common_name: Some(row.german_name.clone()),
                common_name_de: Some(row.german_name.clone()),
                synonyms: Some(row.synonyms.clone()).filter(|s| !s.is_empty()),
                edibility: Some(row.edibility.as_str().to_string()),
                ..Default::default()
            },
        )
        .await?;
        self.report.species_created += 1;
        tracing::debug!(
            species_id = species.id,
            scientific_name = %species.scientific_name,
            "Imported species"
        );
        Ok(())
    }

    async fn resolve_taxon(
        &mut self,
        rank: TaxonRank,
        name: &str,
        parent_id: Option<DbId>,
    ) -> Result<DbId, sqlx::Error> {
        if let Some(id) = self.cache.get(rank, name) {
            return Ok(id);
        }

        let id = match TaxonRepo::find_by_name(self.pool, rank, name, parent_id).await? {
            Some(existing) => existing.id,
            None => self.create_taxon(rank, name, None, parent_id).await?,
        };
        self.cache.insert(rank, name, id);
        Ok(id)
    }

    async fn resolve_genus(
        &mut self,
        row: &ImportRow,
        family_id: Option<DbId>,
    ) -> Result<DbId, sqlx::Error> {
        let rank = TaxonRank::Genus;
        if let Some(id) = self.cache.get(rank, &row.genus) {
            return Ok(id);
        }

        let common_name = Some(row.genus_german.as_str()).filter(|n| !n.is_empty());
        let id = match TaxonRepo::find_by_name(self.pool, rank, &row.genus, None).await? {
            Some(existing) => {
                let updated = TaxonRepo::assign_common_name(
                    self.pool,
                    rank,
                    existing.id,
                    common_name,
                    family_id,
                )
                .await?;
                if updated {
                    self.report.genera_updated += 1;
                    tracing::debug!(genus_id = existing.id, genus = %row.genus, "Updated genus");
                }
                existing.id
            }
            None => self.create_taxon(rank, &row.genus, common_name, family_id).await?,
        };
        self.cache.insert(rank, &row.genus, id);
        Ok(id)
    }

    async fn create_taxon(
        &mut self,
        rank: TaxonRank,
        name: &str,
        common_name: Option<&str>,
        parent_id: Option<DbId>,
    ) -> Result<DbId, sqlx::Error> {
        let taxon = TaxonRepo::create(
            self.pool,
            rank,
            &CreateTaxon {
                name: name.to_string(),
                common_name: common_name.map(str::to_string),
                description: None,
                parent_id,
            },
        )
        .await?;
        self.report.record_taxon_created(rank);
        tracing::info!(rank = %rank, taxon_id = taxon.id, name = %taxon.name, "Imported taxon");
        Ok(taxon.id)
    }
}

/// Run the import command and print a summary.
pub async fn run(pool: &DbPool, args: &ImportSpeciesArgs) -> anyhow::Result<ImportReport> {
    let file = std::fs::File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let records = read_records(file, args.skip_lines)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    if args.clear {
        clear_catalog(pool).await?;
    }

    tracing::info!(rows = records.len(), file = %args.file.display(), "Starting species import");
    let mut importer = SpeciesImporter::new(pool);
    for record in &records {
        importer.import_record(record.as_slice()).await;
    }

    print_summary(importer.report(), importer.cache());
    Ok(importer.into_report())
}

fn print_summary(report: &ImportReport, cache: &TaxonCache) {
    println!("Rows read:          {}", report.rows_read);
    println!("Species created:    {}", report.species_created);
    println!("Species duplicates: {}", report.species_duplicate);
    println!("Rows skipped:       {}", report.rows_skipped());
    for (reason, count) in &report.skipped {
        println!("  {reason}: {count}");
    }
    println!("Rows failed:        {}", report.rows_failed);
    println!("Genera updated:     {}", report.genera_updated);
    for rank in TaxonRank::ALL {
        println!(
            "{:<20}{}",
            format!("{} created:", rank.display_name()),
            report.taxa_created_for(rank)
        );
    }
    println!("Cache hits/misses:  {}/{}", cache.hits(), cache.misses());
}
