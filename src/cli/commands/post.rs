use crate::config::Config;
use crate::db::Store;

pub async fn cmd_post_add(config: &Config, title: &str, body: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_post_by_title(title).await?.is_some() {
        println!("A post titled '{title}' already exists.");
        return Ok(());
    }

    let post = store.create_post(title, body).await?;
    println!("✓ Created post #{}: {}", post.id, post.title);

    Ok(())
}
