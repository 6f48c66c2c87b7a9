use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_search(config: Config, keyword: &str) -> anyhow::Result<()> {
    println!("Searching for: {keyword}");

    let state = SharedState::new(config).await?;
    let result = state.search_service.search(keyword, None).await?;

    println!();
    println!("{}", result.keyword);
    println!("{:-<60}", "");
    println!("Image: {}", result.image_source);
    println!();
    println!("{}", result.summary);
    println!();
    println!("{}", result.article);

    Ok(())
}
