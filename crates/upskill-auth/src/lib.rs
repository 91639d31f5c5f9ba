//! UpSkillHub Auth: client session lifecycle, bearer-token
//! persistence and expiry inspection, and the translation of auth
//! failures into display messages.

pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod store;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use session::{SessionHandle, SessionManager, SessionPhase};
pub use storage::{JsonFileStore, MemoryStore};
pub use store::TokenStore;
pub use token::{TokenClaims, is_token_expired};
