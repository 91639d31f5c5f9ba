//! HTTP implementation of [`EnrollmentApi`].

use upskill_core::api::EnrollmentApi;
use upskill_core::error::UpskillResult;
use upskill_core::models::enrollment::{CreateEnrollment, Enrollment};

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct HttpEnrollmentApi {
    client: ApiClient,
}

impl HttpEnrollmentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl EnrollmentApi for HttpEnrollmentApi {
    async fn create(&self, token: &str, input: CreateEnrollment) -> UpskillResult<Enrollment> {
        self.client
            .post(&["enrollments"], &input, Some(token))
            .await
    }

    async fn get_by_course(&self, token: &str, course_id: &str) -> UpskillResult<Enrollment> {
        self.client
            .get(&["enrollments", course_id], Some(token))
            .await
    }

    async fn list_mine(&self, token: &str) -> UpskillResult<Vec<Enrollment>> {
        self.client.get(&["enrollments"], Some(token)).await
    }
}
