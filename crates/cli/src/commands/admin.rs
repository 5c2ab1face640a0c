//! `myco grant-admin`: promote an existing user.

use anyhow::Context;
use myco_core::roles::ROLE_ADMIN;
use myco_db::repositories::UserRepo;
use myco_db::DbPool;

/// Give the user registered under `email` the admin role.
///
/// Returns `false` when the user already was an admin.
pub async fn grant(pool: &DbPool, email: &str) -> anyhow::Result<bool> {
    let email = email.trim().to_lowercase();
    let user = UserRepo::find_by_email(pool, &email)
        .await?
        .with_context(|| format!("no user registered with email {email}"))?;

    if user.role == ROLE_ADMIN {
        println!("{} is already an admin", user.username);
        return Ok(false);
    }

    UserRepo::set_role(pool, user.id, ROLE_ADMIN).await?;
    tracing::info!(user_id = user.id, username = %user.username, "Granted admin role");
    println!("{} is now an admin", user.username);
    Ok(true)
}
