//! `myco check-orphans`: report findings that point at a missing species.

use myco_db::repositories::FindingRepo;
use myco_db::DbPool;

/// Print every orphaned finding and return how many were found.
pub async fn run(pool: &DbPool) -> anyhow::Result<usize> {
    let orphans = FindingRepo::list_orphaned(pool).await?;

    if orphans.is_empty() {
        println!("No orphaned findings.");
        return Ok(0);
    }

    println!("Found {} orphaned findings:", orphans.len());
    for orphan in &orphans {
        println!(
            "  finding {} (species {}, user {} {}, found {})",
            orphan.id,
            orphan.species_id,
            orphan.user_id,
            orphan.username.as_deref().unwrap_or("<deleted>"),
            orphan.found_at.format("%Y-%m-%d"),
        );
    }
    tracing::warn!(count = orphans.len(), "Orphaned findings detected");
    Ok(orphans.len())
}
