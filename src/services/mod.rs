pub mod avatar;
pub use avatar::AvatarStorage;

pub mod prompts;
pub mod text;

pub mod search;
pub use search::{SearchError, SearchService};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, CurrentUser, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod profile_service;
pub mod profile_service_impl;
pub use profile_service::{AvatarUpload, ProfileError, ProfileService, ProfileUpdate, ProfileView};
pub use profile_service_impl::SeaOrmProfileService;
