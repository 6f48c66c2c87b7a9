mod post;
mod search;
mod top;
mod user;

pub use post::cmd_post_add;
pub use search::cmd_search;
pub use top::cmd_top;
pub use user::cmd_user_add;
