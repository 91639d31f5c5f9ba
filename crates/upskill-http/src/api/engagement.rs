//! HTTP implementation of [`EngagementApi`] (newsletter and contact form).

use upskill_core::api::EngagementApi;
use upskill_core::error::UpskillResult;
use upskill_core::models::engagement::{
    ContactReceipt, ContactSubmission, MessageResponse, NewsletterSubscription,
};

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct HttpEngagementApi {
    client: ApiClient,
}

impl HttpEngagementApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl EngagementApi for HttpEngagementApi {
    async fn subscribe_newsletter(
        &self,
        input: NewsletterSubscription,
    ) -> UpskillResult<MessageResponse> {
        self.client
            .post(&["newsletter", "subscribe"], &input, None)
            .await
    }

    async fn submit_contact(&self, input: ContactSubmission) -> UpskillResult<ContactReceipt> {
        self.client.post(&["contact"], &input, None).await
    }
}
