pub mod auth_service;
pub use auth_service::{AuthError, AuthService, LoginResult, RegisterInput};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod token;
pub use token::{Claims, TokenError, TokenService};

pub mod assist;
pub use assist::{ChatReply, ContentAssistService, JobDraft, SeoAnalysis};
