//! Admin gate
//!
//! HTTP surface of the back-office: the password-to-session exchange, the
//! gate in front of `/api/admin`, signed inbound callbacks and the health
//! check.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod session;
pub mod state;
pub mod token;
pub mod types;

// Re-export main types for convenience
pub use auth::{
    require_admin, AdminSession, AuthError, Authenticator, Clock, IssuedSession, RejectReason, SystemClock,
    VerifyOutcome,
};
pub use error::{AdminError, AdminResult, ApiError};
pub use server::{build_router, serve, start_server};
pub use session::{extract_session_token, SESSION_COOKIE_NAME};
pub use state::AppState;
pub use token::{SessionClaims, TokenError, ADMIN_ROLE};
