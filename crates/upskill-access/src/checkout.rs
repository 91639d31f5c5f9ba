//! Enrollment/payment orchestration.
//!
//! A flow runs `Idle → AuthRequired | Checkout`, then
//! `Checkout → Processing → Success | Error`, with `Error → Checkout` on
//! retry. Whoever started the flow holds an [`AccessTicket`] that
//! resolves once: with success when the flow succeeds, with failure when
//! it is closed or dropped first.

use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use upskill_auth::SessionHandle;
use upskill_core::api::{EnrollmentApi, PaymentApi};
use upskill_core::error::{UpskillError, UpskillResult};
use upskill_core::models::course::Course;
use upskill_core::models::enrollment::{CreateEnrollment, Enrollment, EnrollmentPaymentStatus};
use upskill_core::models::payment::{CreatePayment, PaymentMethod, PaymentStatus};

use crate::config::CheckoutConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    /// Waiting for the user to sign in; see [`EnrollmentFlow::resume`].
    AuthRequired,
    Checkout,
    Processing,
    Success { message: String },
    Error { message: String },
    Closed,
}

/// Outcome handed back to whoever asked for access.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessResult {
    pub success: bool,
    pub error: Option<String>,
    /// The enrollment backing the granted access, when there is one.
    /// Anonymous access to a free course carries none.
    pub enrollment: Option<Enrollment>,
}

impl AccessResult {
    pub fn granted(enrollment: Option<Enrollment>) -> Self {
        Self {
            success: true,
            error: None,
            enrollment,
        }
    }

    pub fn declined(error: Option<String>) -> Self {
        Self {
            success: false,
            error,
            enrollment: None,
        }
    }
}

/// Pending answer to an access request.
#[derive(Debug)]
pub struct AccessTicket {
    rx: oneshot::Receiver<AccessResult>,
}

impl AccessTicket {
    /// Wait for the flow to resolve. A flow dropped without resolving
    /// counts as declined.
    pub async fn wait(self) -> AccessResult {
        self.rx.await.unwrap_or_else(|_| AccessResult::declined(None))
    }

    /// Non-blocking check; `None` while the flow is still open.
    pub fn try_result(&mut self) -> Option<AccessResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(AccessResult::declined(None)),
        }
    }
}

/// Chosen payment method and its method-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub upi_id: Option<String>,
}

impl PaymentDetails {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            method,
            upi_id: None,
        }
    }

    pub fn upi(upi_id: impl Into<String>) -> Self {
        Self {
            method: PaymentMethod::Upi,
            upi_id: Some(upi_id.into()),
        }
    }

    /// UPI needs a non-empty identifier; other methods need nothing more.
    pub fn validate(&self) -> UpskillResult<()> {
        if self.method == PaymentMethod::Upi
            && self.upi_id.as_deref().is_none_or(|id| id.trim().is_empty())
        {
            return Err(UpskillError::validation("Please enter your UPI ID"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StartOptions {
    /// Let anonymous users straight into free content without enrolling.
    pub skip_auth_for_free: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            skip_auth_for_free: true,
        }
    }
}

/// Starts enrollment flows. Holds no per-flow state, so any number of
/// flows for different courses may run side by side.
pub struct Orchestrator<E: EnrollmentApi, P: PaymentApi> {
    enrollments: E,
    payments: P,
    config: CheckoutConfig,
}

impl<E: EnrollmentApi, P: PaymentApi> Orchestrator<E, P> {
    pub fn new(enrollments: E, payments: P, config: CheckoutConfig) -> Self {
        Self {
            enrollments,
            payments,
            config,
        }
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Begin a flow for `course` on behalf of the current session.
    pub fn start(
        &self,
        course: Course,
        session: &SessionHandle,
        options: StartOptions,
    ) -> (EnrollmentFlow<'_, E, P>, AccessTicket) {
        let (tx, rx) = oneshot::channel();
        let mut flow = EnrollmentFlow {
            orchestrator: self,
            course,
            session: session.clone(),
            state: CheckoutState::Idle,
            payment: None,
            reply: Some(tx),
        };

        let authenticated = session.is_authenticated();
        if flow.course.is_free() && !authenticated && options.skip_auth_for_free {
            info!(course_id = %flow.course.id, "Free course opened without enrollment");
            flow.resolve(AccessResult::granted(None));
            flow.state = CheckoutState::Closed;
        } else if !authenticated {
            flow.transition(CheckoutState::AuthRequired);
        } else {
            flow.transition(CheckoutState::Checkout);
        }

        (flow, AccessTicket { rx })
    }
}

/// One enroll/buy attempt for one course.
pub struct EnrollmentFlow<'a, E: EnrollmentApi, P: PaymentApi> {
    orchestrator: &'a Orchestrator<E, P>,
    course: Course,
    session: SessionHandle,
    state: CheckoutState,
    payment: Option<PaymentDetails>,
    reply: Option<oneshot::Sender<AccessResult>>,
}

impl<E: EnrollmentApi, P: PaymentApi> EnrollmentFlow<'_, E, P> {
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn payment_details(&self) -> Option<&PaymentDetails> {
        self.payment.as_ref()
    }

    /// Whether the checkout step asks for a payment method.
    pub fn requires_payment(&self) -> bool {
        !self.course.is_free()
    }

    /// Continue after a sign-in attempt. Moves `AuthRequired → Checkout`
    /// once the session is authenticated; otherwise nothing changes.
    pub fn resume(&mut self) -> &CheckoutState {
        if self.state == CheckoutState::AuthRequired && self.session.is_authenticated() {
            self.transition(CheckoutState::Checkout);
        }
        &self.state
    }

    /// Choose how to pay. Only meaningful during checkout.
    pub fn select_payment(&mut self, details: PaymentDetails) {
        if self.state == CheckoutState::Checkout {
            self.payment = Some(details);
        }
    }

    /// Whether [`submit`](Self::submit) would send a request right now.
    pub fn can_submit(&self) -> bool {
        self.check_submittable().is_ok()
    }

    fn check_submittable(&self) -> UpskillResult<()> {
        if self.state != CheckoutState::Checkout {
            return Err(UpskillError::validation("Nothing to submit right now"));
        }
        if self.requires_payment() {
            match &self.payment {
                Some(details) => details.validate()?,
                None => return Err(UpskillError::validation("Please choose a payment method")),
            }
        }
        Ok(())
    }

    /// Send the enrollment (free) or payment (paid) request.
    ///
    /// Returns a validation error without any request when the checkout
    /// step is incomplete. Otherwise the flow ends in `Success` or
    /// `Error`, or goes back to `AuthRequired` if the session was lost.
    pub async fn submit(&mut self) -> UpskillResult<&CheckoutState> {
        self.check_submittable()?;

        let Some(token) = self.session.token() else {
            self.transition(CheckoutState::AuthRequired);
            return Ok(&self.state);
        };

        self.transition(CheckoutState::Processing);
        let outcome = if self.requires_payment() {
            self.pay(&token).await
        } else {
            self.enroll_free(&token).await
        };

        match outcome {
            Ok(enrollment) => {
                let message = if self.requires_payment() {
                    format!("Payment successful! You now have access to {}.", self.course.title)
                } else {
                    format!("Successfully enrolled in {}!", self.course.title)
                };
                self.resolve(AccessResult::granted(Some(enrollment)));
                self.transition(CheckoutState::Success { message });
            }
            Err(err) => {
                warn!(course_id = %self.course.id, error = %err, "Checkout failed");
                self.transition(CheckoutState::Error {
                    message: err.message(),
                });
            }
        }
        Ok(&self.state)
    }

    async fn enroll_free(&self, token: &str) -> UpskillResult<Enrollment> {
        let request = CreateEnrollment {
            course_id: self.course.id.clone(),
            payment_method: Some(self.orchestrator.config.free_payment_marker.clone()),
        };
        match self.orchestrator.enrollments.create(token, request).await {
            Ok(enrollment) => Ok(enrollment),
            Err(err) if is_already_enrolled(&err) => {
                debug!(course_id = %self.course.id, "Already enrolled, treating as success");
                Ok(assumed_enrollment(&self.course, EnrollmentPaymentStatus::Free))
            }
            Err(err) => Err(err),
        }
    }

    async fn pay(&self, token: &str) -> UpskillResult<Enrollment> {
        let details = self
            .payment
            .clone()
            .ok_or_else(|| UpskillError::validation("Please choose a payment method"))?;
        let request = CreatePayment {
            course_id: self.course.id.clone(),
            amount: self.course.price,
            payment_method: details.method,
            upi_id: details.upi_id.filter(|_| details.method == PaymentMethod::Upi),
        };

        let payment = self.orchestrator.payments.create(token, request).await?;
        if payment.status == PaymentStatus::Failed {
            return Err(UpskillError::Api {
                status: 402,
                message: "Payment failed. Please try again.".into(),
                details: None,
            });
        }

        if self.orchestrator.config.confirm_paid_enrollment {
            return self
                .orchestrator
                .enrollments
                .get_by_course(token, &self.course.id)
                .await
                .map_err(|err| {
                    warn!(course_id = %self.course.id, error = %err, "Paid enrollment not visible yet");
                    match err {
                        UpskillError::Api { status, .. } => UpskillError::Api {
                            status,
                            message: "Payment received, but your enrollment is not ready yet. \
                                      Please try again in a moment."
                                .into(),
                            details: None,
                        },
                        other => other,
                    }
                });
        }

        Ok(assumed_enrollment(&self.course, EnrollmentPaymentStatus::Completed))
    }

    /// `Error → Checkout`, keeping the chosen payment method.
    pub fn retry(&mut self) -> &CheckoutState {
        if matches!(self.state, CheckoutState::Error { .. }) {
            self.transition(CheckoutState::Checkout);
        }
        &self.state
    }

    /// Close the flow. Before success this declines the pending request;
    /// an in-flight HTTP call is not cancelled.
    pub fn close(&mut self) {
        self.resolve(AccessResult::declined(None));
        self.transition(CheckoutState::Closed);
    }

    /// After `Success`, keep the confirmation up for the configured delay
    /// and then close. Other states are left alone.
    pub async fn auto_close(&mut self) {
        if !matches!(self.state, CheckoutState::Success { .. }) {
            return;
        }
        tokio::time::sleep(self.success_close_delay()).await;
        self.transition(CheckoutState::Closed);
    }

    pub fn success_close_delay(&self) -> Duration {
        self.orchestrator.config.success_close_delay
    }

    fn resolve(&mut self, result: AccessResult) {
        if let Some(reply) = self.reply.take() {
            // The requester may have stopped waiting.
            let _ = reply.send(result);
        }
    }

    fn transition(&mut self, next: CheckoutState) {
        debug!(course_id = %self.course.id, from = ?self.state, to = ?next, "Checkout transition");
        self.state = next;
    }
}

fn is_already_enrolled(err: &UpskillError) -> bool {
    matches!(err, UpskillError::Api { message, .. }
        if message.to_ascii_lowercase().contains("already enrolled"))
}

/// Stand-in for an enrollment the backend reported (or implied) but did
/// not return.
fn assumed_enrollment(course: &Course, payment_status: EnrollmentPaymentStatus) -> Enrollment {
    Enrollment {
        id: String::new(),
        course_id: course.id.clone(),
        payment_status,
        progress: 0.0,
        enrolled_at: None,
    }
}
