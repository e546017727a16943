//! Session, seeding and engine status commands.

use bazarlink_core::{Password, UserMetadata};
use bazarlink_data::fallback::{DEMO_EMAIL, DEMO_PASSWORD};
use bazarlink_data::{DataConfig, Database};
use tracing::info;

use super::{output, signed_in};

/// Seed demo data into an empty fallback store.
///
/// # Errors
///
/// Returns an error if the engine cannot seed (the remote engine never can)
/// or storage fails.
pub async fn seed(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    match db.seed_demo_data().await? {
        Some(summary) => {
            info!(products = summary.products.len(), "Seed complete");
            output::line(&format!(
                "Seeded demo account {DEMO_EMAIL} / {DEMO_PASSWORD} with {} products",
                summary.products.len()
            ));
        }
        None => output::line("Store already has users, nothing seeded"),
    }
    Ok(())
}

/// Report the selected engine and where it stores data.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn status(db: &Database, config: &DataConfig) -> Result<(), Box<dyn std::error::Error>> {
    let location = if db.is_remote() {
        config.supabase_url.clone().unwrap_or_default()
    } else {
        config.data_dir.display().to_string()
    };
    let session = db.get_session().await?;
    output::json(&serde_json::json!({
        "engine": db.engine_kind().to_string(),
        "location": location,
        "signed_in_as": session.map(|s| s.user.email),
    }))
}

/// Create an account.
///
/// # Errors
///
/// Returns an error if the email is taken or malformed.
pub async fn sign_up(
    db: &Database,
    email: &str,
    password: &str,
    name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = name.map(|display_name| UserMetadata {
        display_name: Some(display_name),
        ..UserMetadata::default()
    });
    let user = db.sign_up(email, &Password::from(password), metadata).await?;
    output::json(&user)
}

/// Sign in.
///
/// # Errors
///
/// Returns an error if the credentials are rejected.
pub async fn sign_in(
    db: &Database,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = db.sign_in(email, &Password::from(password)).await?;
    info!(email = %user.email, "Signed in");
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns an error if the session cannot be cleared.
pub async fn sign_out(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    db.sign_out().await?;
    output::line("Signed out");
    Ok(())
}

/// Print the signed-in user.
///
/// # Errors
///
/// Returns an error if nobody is signed in.
pub async fn whoami(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    output::json(&user)
}
