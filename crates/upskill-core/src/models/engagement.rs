//! Newsletter and contact-form shapes.

use serde::{Deserialize, Serialize};

use super::opaque_id;

#[derive(Debug, Clone, Serialize)]
pub struct NewsletterSubscription {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContactReceipt {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub message: String,
}
