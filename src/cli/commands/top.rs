use crate::config::Config;
use crate::db::Store;

pub async fn cmd_top(config: &Config, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let searches = store.top_searches(limit).await?;

    if searches.is_empty() {
        println!("No searches yet.");
        return Ok(());
    }

    println!("Top searches:");
    println!("{:-<60}", "");

    for (i, search) in searches.iter().enumerate() {
        println!("[{}] {} ({} views)", i + 1, search.keyword, search.view_count);
        if !search.summary.is_empty() {
            println!("    {}", search.summary);
        }
    }

    Ok(())
}
