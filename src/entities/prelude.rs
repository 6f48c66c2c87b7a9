pub use super::history::Entity as History;
pub use super::popular_posts::Entity as PopularPosts;
pub use super::popular_searches::Entity as PopularSearches;
pub use super::posts::Entity as Posts;
pub use super::search_cache::Entity as SearchCache;
pub use super::users::Entity as Users;
