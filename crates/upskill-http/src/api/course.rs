//! HTTP implementation of [`CourseApi`].

use upskill_core::api::CourseApi;
use upskill_core::error::UpskillResult;
use upskill_core::models::course::{Course, CourseQuery};

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct HttpCourseApi {
    client: ApiClient,
}

impl HttpCourseApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl CourseApi for HttpCourseApi {
    async fn list(&self, query: CourseQuery) -> UpskillResult<Vec<Course>> {
        self.client
            .get_with_query(&["courses"], &query, None)
            .await
    }

    async fn get(&self, id: &str) -> UpskillResult<Course> {
        self.client.get(&["courses", id], None).await
    }
}
