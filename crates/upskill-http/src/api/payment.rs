//! HTTP implementation of [`PaymentApi`].

use upskill_core::api::PaymentApi;
use upskill_core::error::UpskillResult;
use upskill_core::models::payment::{CreatePayment, Payment};

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct HttpPaymentApi {
    client: ApiClient,
}

impl HttpPaymentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl PaymentApi for HttpPaymentApi {
    async fn create(&self, token: &str, input: CreatePayment) -> UpskillResult<Payment> {
        self.client.post(&["payments"], &input, Some(token)).await
    }
}
