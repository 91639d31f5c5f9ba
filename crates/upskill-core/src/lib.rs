//! UpSkillHub Core: domain models, the backend contract as traits,
//! client-side persistence abstraction and shared error types.

pub mod api;
pub mod error;
pub mod models;
pub mod storage;
pub mod validation;

pub use error::{UpskillError, UpskillResult};
