//! UpSkillHub HTTP: reqwest-backed implementations of the backend
//! traits from `upskill-core`.
//!
//! This crate provides:
//! - Client configuration and the request wrapper ([`ApiConfig`], [`ApiClient`])
//! - Error types ([`HttpError`])
//! - One implementation per backend trait (see [`api`])

pub mod api;
mod client;
mod error;

pub use api::{HttpAuthApi, HttpCourseApi, HttpEngagementApi, HttpEnrollmentApi, HttpPaymentApi};
pub use client::{API_URL_ENV, ApiClient, ApiConfig};
pub use error::HttpError;
