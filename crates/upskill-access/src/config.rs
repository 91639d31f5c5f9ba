//! Checkout configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// How long the success confirmation stays up before the flow
    /// closes itself (default: 2.5 s).
    pub success_close_delay: Duration,
    /// Payment method sent when claiming a free course (default: `free`).
    pub free_payment_marker: String,
    /// Re-fetch the enrollment after a successful payment instead of
    /// trusting the backend to have created it (default: off).
    pub confirm_paid_enrollment: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            success_close_delay: Duration::from_millis(2500),
            free_payment_marker: "free".into(),
            confirm_paid_enrollment: false,
        }
    }
}
