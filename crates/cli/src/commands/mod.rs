//! Command implementations.

pub mod account;
pub mod catalog;
pub mod output;
pub mod shop;

use bazarlink_core::AuthUser;
use bazarlink_data::Database;

/// The signed-in user, or an error telling the caller to sign in.
async fn signed_in(db: &Database) -> Result<AuthUser, Box<dyn std::error::Error>> {
    db.get_session()
        .await?
        .map(|session| session.user)
        .ok_or_else(|| "Not signed in (run `bazarlink signin` or pass --login-email/--login-password)".into())
}
