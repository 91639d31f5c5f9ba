//! Enrollment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::opaque_id;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentPaymentStatus {
    Pending,
    Completed,
    Free,
}

/// A user's right to a course's protected content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(deserialize_with = "opaque_id")]
    pub course_id: String,
    pub payment_status: EnrollmentPaymentStatus,
    /// Completion percentage, 0-100.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub enrolled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollment {
    pub course_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}
