//! HTTP implementations of the backend traits.

mod auth;
mod course;
mod engagement;
mod enrollment;
mod payment;

pub use auth::HttpAuthApi;
pub use course::HttpCourseApi;
pub use engagement::HttpEngagementApi;
pub use enrollment::HttpEnrollmentApi;
pub use payment::HttpPaymentApi;
