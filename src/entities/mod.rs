pub mod prelude;

pub mod history;
pub mod popular_posts;
pub mod popular_searches;
pub mod posts;
pub mod search_cache;
pub mod users;
