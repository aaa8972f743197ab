// ABOUTME: Out-of-band admin seeding
// ABOUTME: Creates the first staff user without going through the API

use tracing::info;

use procura_auth::hash_password;
use procura_core::{validate_admin_registration, UserCreateInput};
use procura_storage::DbState;

use crate::config::Config;

pub async fn seed_admin(
    config: &Config,
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
) -> anyhow::Result<()> {
    let errors = validate_admin_registration(&username, &email, &password);
    if let Some(first) = errors.first() {
        anyhow::bail!("{}: {}", first.field, first.message);
    }

    let db = DbState::init_with_path(&config.database_path).await?;

    let password_hash = hash_password(&password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let user = db
        .user_storage
        .create_user(UserCreateInput {
            username,
            email,
            first_name,
            last_name,
            password_hash,
            is_staff: true,
        })
        .await?;

    info!("Created admin user: {} ({})", user.username, user.id);
    println!("Admin '{}' created with id {}", user.username, user.id);

    Ok(())
}
