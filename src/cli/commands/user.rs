use crate::config::Config;
use crate::db::Store;

pub async fn cmd_user_add(
    config: &Config,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_email(email).await?.is_some() {
        println!("A user with email {email} already exists.");
        return Ok(());
    }

    let user = store
        .create_user(name, email, password, &config.security)
        .await?;

    println!("✓ Created user #{}", user.id);
    println!("  Email: {}", user.email);
    println!("  API key: {}", user.api_key);

    Ok(())
}
