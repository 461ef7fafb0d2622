//! # Auth Module
//!
//! Identity and access control: user accounts, password hashing,
//! session tokens and the request guard that enforces roles.

pub mod errors;
pub mod role;
pub mod crypto;
pub mod user;
pub mod jwt;
pub mod guard;
pub mod api;

pub use api::AuthService;
pub use errors::{AuthError, AuthResult};
pub use guard::{AccessGuard, Identity};
pub use jwt::{JwtConfig, JwtManager, SessionClaims};
pub use role::Role;
pub use user::{User, UserRepository};
