pub mod cache;
pub mod history;
pub mod popular;
pub mod post;
pub mod user;
