pub mod auth_service;
pub use auth_service::{AuthError, AuthService, SessionUser};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub use user_service::{UserError, UserService};

pub mod user_service_impl;
pub use user_service_impl::SeaOrmUserService;

pub mod review_service;
pub use review_service::{ReviewError, ReviewFeedback, ReviewRequest, ReviewService};

pub mod review_service_impl;
pub use review_service_impl::OpenAiReviewService;
