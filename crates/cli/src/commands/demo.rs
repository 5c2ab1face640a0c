//! `myco generate-findings`: populate a developer database with findings.

use anyhow::{bail, Context};
use myco_core::demo::{generate_finding, DemoFinding};
use myco_db::models::finding::CreateFinding;
use myco_db::repositories::{FindingRepo, SpeciesRepo, UserRepo};
use myco_db::DbPool;

use crate::cli::GenerateFindingsArgs;

/// Species drawn from the catalogue to spread the findings across.
pub const SPECIES_SAMPLE_SIZE: i64 = 20;

fn to_create_finding(f: DemoFinding) -> CreateFinding {
    CreateFinding {
        species_id: f.species_id,
        found_at: Some(f.found_at),
        latitude: f.latitude,
        longitude: f.longitude,
        location: Some(f.location),
        notes: Some(f.notes),
        quantity: Some(f.quantity),
        weather: Some(f.weather),
        temperature: Some(f.temperature),
        ..Default::default()
    }
}

/// Create `args.count` findings for `args.username` and return how many were
/// inserted.
pub async fn run(pool: &DbPool, args: &GenerateFindingsArgs) -> anyhow::Result<u32> {
    let user = UserRepo::find_by_username(pool, &args.username)
        .await?
        .with_context(|| format!("user '{}' not found", args.username))?;

    let species = SpeciesRepo::random_sample(pool, SPECIES_SAMPLE_SIZE).await?;
    if species.is_empty() {
        bail!("the species catalogue is empty; run import-species first");
    }

    let findings: Vec<DemoFinding> = {
        let mut rng = rand::rng();
        (0..args.count)
            .filter_map(|_| generate_finding(&mut rng, &species))
            .collect()
    };

    let mut created = 0;
    for finding in findings {
        let row = FindingRepo::create(pool, user.id, &to_create_finding(finding)).await?;
        tracing::debug!(finding_id = row.id, species_id = row.species_id, "Created demo finding");
        created += 1;
    }

    tracing::info!(user_id = user.id, count = created, "Generated demo findings");
    println!("Created {created} findings for {}", user.username);
    Ok(created)
}
