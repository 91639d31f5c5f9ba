//! Integration tests for the access gate and the enrollment/payment flow.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;
use upskill_access::{
    AccessGate, CheckoutConfig, CheckoutState, GateState, Orchestrator, PaymentDetails,
    StartOptions,
};
use upskill_auth::{AuthConfig, MemoryStore, SessionManager};
use upskill_core::api::{AuthApi, EnrollmentApi, PaymentApi};
use upskill_core::error::{NETWORK_ERROR_MESSAGE, UpskillError, UpskillResult};
use upskill_core::models::auth::{AuthResponse, SignInRequest, SignUpRequest};
use upskill_core::models::course::Course;
use upskill_core::models::enrollment::{CreateEnrollment, Enrollment, EnrollmentPaymentStatus};
use upskill_core::models::payment::{CreatePayment, Payment, PaymentMethod, PaymentStatus};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

fn make_token() -> String {
    let exp = Utc::now().timestamp() + 3600;
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(json!({ "exp": exp }).to_string())
    )
}

struct FakeAuthApi;

impl AuthApi for FakeAuthApi {
    async fn sign_up(&self, _input: SignUpRequest) -> UpskillResult<AuthResponse> {
        Err(UpskillError::Internal("not used".into()))
    }

    async fn sign_in(&self, input: SignInRequest) -> UpskillResult<AuthResponse> {
        if input.password != "secret1" {
            return Err(UpskillError::Api {
                status: 401,
                message: "Invalid email or password".into(),
                details: None,
            });
        }
        Ok(serde_json::from_value(json!({
            "token": make_token(),
            "user": { "id": "u1", "email": input.email },
        }))
        .unwrap())
    }
}

#[derive(Default)]
struct BackendState {
    /// course id -> enrollment
    enrollments: HashMap<String, Enrollment>,
    enrollment_creates: usize,
    enrollment_lookups: usize,
    payment_creates: usize,
    decline_with: Option<String>,
    materialize_on_payment: bool,
    lookups_offline: bool,
    last_payment: Option<CreatePayment>,
}

#[derive(Clone, Default)]
struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    fn with_enrollment(self, course_id: &str) -> Self {
        self.state.lock().enrollments.insert(
            course_id.into(),
            Enrollment {
                id: format!("e-{course_id}"),
                course_id: course_id.into(),
                payment_status: EnrollmentPaymentStatus::Completed,
                progress: 40.0,
                enrolled_at: None,
            },
        );
        self
    }

    fn counts(&self) -> (usize, usize, usize) {
        let s = self.state.lock();
        (s.enrollment_creates, s.payment_creates, s.enrollment_lookups)
    }
}

impl EnrollmentApi for FakeBackend {
    async fn create(&self, _token: &str, input: CreateEnrollment) -> UpskillResult<Enrollment> {
        let mut s = self.state.lock();
        s.enrollment_creates += 1;
        if s.enrollments.contains_key(&input.course_id) {
            return Err(UpskillError::Api {
                status: 400,
                message: "Already enrolled in this course".into(),
                details: None,
            });
        }
        let enrollment = Enrollment {
            id: format!("e-{}", input.course_id),
            course_id: input.course_id.clone(),
            payment_status: EnrollmentPaymentStatus::Free,
            progress: 0.0,
            enrolled_at: None,
        };
        s.enrollments.insert(input.course_id, enrollment.clone());
        Ok(enrollment)
    }

    async fn get_by_course(&self, _token: &str, course_id: &str) -> UpskillResult<Enrollment> {
        let mut s = self.state.lock();
        s.enrollment_lookups += 1;
        if s.lookups_offline {
            return Err(UpskillError::network());
        }
        s.enrollments
            .get(course_id)
            .cloned()
            .ok_or_else(|| UpskillError::Api {
                status: 404,
                message: "Enrollment not found".into(),
                details: None,
            })
    }

    async fn list_mine(&self, _token: &str) -> UpskillResult<Vec<Enrollment>> {
        Ok(self.state.lock().enrollments.values().cloned().collect())
    }
}

impl PaymentApi for FakeBackend {
    async fn create(&self, _token: &str, input: CreatePayment) -> UpskillResult<Payment> {
        let mut s = self.state.lock();
        s.payment_creates += 1;
        s.last_payment = Some(input.clone());
        if let Some(message) = s.decline_with.clone() {
            return Err(UpskillError::Api {
                status: 402,
                message,
                details: None,
            });
        }
        if s.materialize_on_payment {
            s.enrollments.insert(
                input.course_id.clone(),
                Enrollment {
                    id: "e-paid".into(),
                    course_id: input.course_id.clone(),
                    payment_status: EnrollmentPaymentStatus::Completed,
                    progress: 0.0,
                    enrolled_at: None,
                },
            );
        }
        Ok(Payment {
            id: "p1".into(),
            course_id: input.course_id,
            amount: input.amount,
            payment_method: Some("card".into()),
            status: PaymentStatus::Completed,
            transaction_id: None,
        })
    }
}

fn course(id: &str, price: f64) -> Course {
    serde_json::from_value(json!({ "id": id, "title": format!("Course {id}"), "price": price }))
        .unwrap()
}

fn free_course() -> Course {
    course("1", 0.0)
}

fn paid_course() -> Course {
    course("42", 49.99)
}

fn session_manager() -> SessionManager<FakeAuthApi, MemoryStore> {
    let mgr = SessionManager::new(FakeAuthApi, MemoryStore::new(), AuthConfig::default());
    mgr.hydrate();
    mgr
}

async fn signed_in() -> SessionManager<FakeAuthApi, MemoryStore> {
    let mgr = session_manager();
    mgr.sign_in("a@b.com", "secret1").await.unwrap();
    mgr
}

fn orchestrator(backend: &FakeBackend) -> Orchestrator<FakeBackend, FakeBackend> {
    Orchestrator::new(backend.clone(), backend.clone(), CheckoutConfig::default())
}

// ---------------------------------------------------------------------------
// Anonymous entry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_free_course_short_circuits_to_success() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = session_manager();

    let (flow, mut ticket) = orch.start(free_course(), &session.handle(), StartOptions::default());

    let result = ticket.try_result().expect("resolved immediately");
    assert!(result.success);
    assert_eq!(result.enrollment, None);
    assert_eq!(flow.state(), &CheckoutState::Closed);
    assert_eq!(backend.counts(), (0, 0, 0));
}

#[tokio::test]
async fn anonymous_free_course_can_require_sign_in() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = session_manager();

    let (flow, mut ticket) = orch.start(
        free_course(),
        &session.handle(),
        StartOptions {
            skip_auth_for_free: false,
        },
    );

    assert_eq!(flow.state(), &CheckoutState::AuthRequired);
    assert_eq!(ticket.try_result(), None);
}

#[tokio::test]
async fn paid_course_resumes_into_checkout_after_sign_in() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = session_manager();

    let (mut flow, ticket) = orch.start(paid_course(), &session.handle(), StartOptions::default());
    assert_eq!(flow.state(), &CheckoutState::AuthRequired);

    // Failed sign-in keeps the request suspended.
    assert!(session.sign_in("a@b.com", "wrong").await.is_err());
    assert_eq!(flow.resume(), &CheckoutState::AuthRequired);

    session.sign_in("a@b.com", "secret1").await.unwrap();
    assert_eq!(flow.resume(), &CheckoutState::Checkout);
    assert!(flow.requires_payment());

    flow.select_payment(PaymentDetails::new(PaymentMethod::Card));
    flow.submit().await.unwrap();

    assert!(matches!(flow.state(), CheckoutState::Success { .. }));
    let result = ticket.wait().await;
    assert!(result.success);
    assert_eq!(backend.counts(), (0, 1, 0));
    let sent = backend.state.lock().last_payment.clone().unwrap();
    assert_eq!(sent.course_id, "42");
    assert_eq!(sent.amount, 49.99);
    assert_eq!(sent.payment_method, PaymentMethod::Card);
}

#[tokio::test]
async fn abandoning_sign_in_declines_the_request() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = session_manager();

    let (mut flow, ticket) = orch.start(paid_course(), &session.handle(), StartOptions::default());
    flow.close();

    let result = ticket.wait().await;
    assert!(!result.success);
    assert_eq!(flow.state(), &CheckoutState::Closed);
    assert_eq!(backend.counts(), (0, 0, 0));
}

// ---------------------------------------------------------------------------
// Checkout outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn declined_card_stays_retryable_and_gate_locked() {
    let backend = FakeBackend::default();
    backend.state.lock().decline_with = Some("Card declined".into());
    let orch = orchestrator(&backend);
    let session = signed_in().await;
    let mut gate = AccessGate::new(paid_course(), backend.clone(), session.handle());
    assert_eq!(gate.refresh().await, GateState::Locked);

    let (mut flow, mut ticket) = gate.request_access(&orch, StartOptions::default());
    assert_eq!(flow.state(), &CheckoutState::Checkout);
    flow.select_payment(PaymentDetails::new(PaymentMethod::Card));
    let state = flow.submit().await.unwrap().clone();

    assert_eq!(
        state,
        CheckoutState::Error {
            message: "Card declined".into()
        }
    );
    assert_eq!(ticket.try_result(), None);
    assert_eq!(gate.state(), GateState::Locked);

    // Retry goes straight back to checkout with the same method.
    assert_eq!(flow.retry(), &CheckoutState::Checkout);
    assert_eq!(
        flow.payment_details().map(|d| d.method),
        Some(PaymentMethod::Card)
    );

    backend.state.lock().decline_with = None;
    flow.submit().await.unwrap();
    let result = ticket.wait().await;
    assert!(result.success);
    assert_eq!(gate.apply(&result), GateState::Unlocked);
}

#[tokio::test]
async fn free_enrollment_is_idempotent() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = signed_in().await;

    for _ in 0..2 {
        let (mut flow, ticket) = orch.start(free_course(), &session.handle(), StartOptions::default());
        assert_eq!(flow.state(), &CheckoutState::Checkout);
        assert!(!flow.requires_payment());
        flow.submit().await.unwrap();
        assert!(matches!(flow.state(), CheckoutState::Success { .. }));

        let result = ticket.wait().await;
        assert!(result.success);
        assert_eq!(result.enrollment.unwrap().course_id, "1");
    }

    let (creates, payments, _) = backend.counts();
    assert_eq!(creates, 2);
    assert_eq!(payments, 0);
    assert_eq!(backend.state.lock().enrollments.len(), 1);
}

#[tokio::test]
async fn payment_step_depends_on_price() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = signed_in().await;

    let (mut free, _) = orch.start(free_course(), &session.handle(), StartOptions::default());
    free.submit().await.unwrap();
    assert_eq!(backend.counts(), (1, 0, 0));

    let (mut paid, _) = orch.start(paid_course(), &session.handle(), StartOptions::default());
    paid.select_payment(PaymentDetails::upi("ada@okbank"));
    paid.submit().await.unwrap();
    assert_eq!(backend.counts(), (1, 1, 0));
    assert_eq!(
        backend.state.lock().last_payment.as_ref().unwrap().upi_id.as_deref(),
        Some("ada@okbank")
    );
}

#[tokio::test]
async fn incomplete_checkout_is_not_submitted() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = signed_in().await;

    let (mut flow, _) = orch.start(paid_course(), &session.handle(), StartOptions::default());
    assert!(!flow.can_submit());
    let err = flow.submit().await.unwrap_err();
    assert_eq!(err.message(), "Please choose a payment method");

    flow.select_payment(PaymentDetails::new(PaymentMethod::Upi));
    assert!(!flow.can_submit());
    let err = flow.submit().await.unwrap_err();
    assert_eq!(err.message(), "Please enter your UPI ID");

    flow.select_payment(PaymentDetails::upi("ada@okbank"));
    assert!(flow.can_submit());
    assert_eq!(flow.state(), &CheckoutState::Checkout);
    assert_eq!(backend.counts(), (0, 0, 0));
}

#[tokio::test]
async fn lost_session_sends_flow_back_to_sign_in() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = signed_in().await;

    let (mut flow, _) = orch.start(free_course(), &session.handle(), StartOptions::default());
    session.sign_out();

    assert_eq!(flow.submit().await.unwrap(), &CheckoutState::AuthRequired);
    assert_eq!(backend.counts(), (0, 0, 0));
}

#[tokio::test]
async fn close_after_success_keeps_the_grant() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = signed_in().await;

    let (mut flow, ticket) = orch.start(free_course(), &session.handle(), StartOptions::default());
    flow.submit().await.unwrap();
    flow.close();

    assert!(ticket.wait().await.success);
}

#[tokio::test(start_paused = true)]
async fn success_closes_itself_after_delay() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = signed_in().await;

    let (mut flow, _) = orch.start(free_course(), &session.handle(), StartOptions::default());
    flow.submit().await.unwrap();
    assert!(matches!(flow.state(), CheckoutState::Success { .. }));

    let started = tokio::time::Instant::now();
    flow.auto_close().await;

    assert_eq!(flow.state(), &CheckoutState::Closed);
    assert!(started.elapsed() >= Duration::from_millis(2500));
}

#[tokio::test]
async fn confirmed_paid_enrollment_is_refetched() {
    let backend = FakeBackend::default();
    backend.state.lock().materialize_on_payment = true;
    let orch = Orchestrator::new(
        backend.clone(),
        backend.clone(),
        CheckoutConfig {
            confirm_paid_enrollment: true,
            ..Default::default()
        },
    );
    let session = signed_in().await;

    let (mut flow, ticket) = orch.start(paid_course(), &session.handle(), StartOptions::default());
    flow.select_payment(PaymentDetails::new(PaymentMethod::Wallet));
    flow.submit().await.unwrap();

    let result = ticket.wait().await;
    assert_eq!(result.enrollment.unwrap().id, "e-paid");
    assert_eq!(backend.counts(), (0, 1, 1));
}

#[tokio::test]
async fn confirmation_failure_is_an_error() {
    let backend = FakeBackend::default();
    let orch = Orchestrator::new(
        backend.clone(),
        backend.clone(),
        CheckoutConfig {
            confirm_paid_enrollment: true,
            ..Default::default()
        },
    );
    let session = signed_in().await;

    let (mut flow, mut ticket) =
        orch.start(paid_course(), &session.handle(), StartOptions::default());
    flow.select_payment(PaymentDetails::new(PaymentMethod::Netbanking));
    flow.submit().await.unwrap();

    assert!(matches!(flow.state(), CheckoutState::Error { .. }));
    assert_eq!(ticket.try_result(), None);
}

#[tokio::test]
async fn confirmation_network_failure_keeps_transport_error() {
    let backend = FakeBackend::default();
    backend.state.lock().lookups_offline = true;
    let orch = Orchestrator::new(
        backend.clone(),
        backend.clone(),
        CheckoutConfig {
            confirm_paid_enrollment: true,
            ..Default::default()
        },
    );
    let session = signed_in().await;

    let (mut flow, _) = orch.start(paid_course(), &session.handle(), StartOptions::default());
    flow.select_payment(PaymentDetails::new(PaymentMethod::Card));
    flow.submit().await.unwrap();

    assert_eq!(
        flow.state(),
        &CheckoutState::Error {
            message: NETWORK_ERROR_MESSAGE.into()
        }
    );
    assert_eq!(backend.counts(), (0, 1, 1));
}

#[tokio::test]
async fn independent_flows_do_not_interfere() {
    let backend = FakeBackend::default();
    backend.state.lock().decline_with = Some("Insufficient funds".into());
    let orch = orchestrator(&backend);
    let session = signed_in().await;

    let (mut free, free_ticket) =
        orch.start(free_course(), &session.handle(), StartOptions::default());
    let (mut paid, mut paid_ticket) =
        orch.start(paid_course(), &session.handle(), StartOptions::default());
    paid.select_payment(PaymentDetails::new(PaymentMethod::Card));

    let (a, b) = tokio::join!(free.submit(), paid.submit());
    assert!(matches!(a.unwrap(), CheckoutState::Success { .. }));
    assert!(matches!(b.unwrap(), CheckoutState::Error { .. }));

    assert!(free_ticket.wait().await.success);
    assert_eq!(paid_ticket.try_result(), None);
}

// ---------------------------------------------------------------------------
// Access gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn existing_enrollment_unlocks_on_first_visit() {
    let backend = FakeBackend::default().with_enrollment("42");
    let session = signed_in().await;
    let mut gate = AccessGate::new(paid_course(), backend.clone(), session.handle());

    assert_eq!(gate.refresh().await, GateState::Unlocked);
    let view = gate.view();
    assert!(view.syllabus_unlocked);
    assert!(view.preview_playable);
    assert_eq!(view.call_to_action, None);

    // One lookup per course and user.
    gate.refresh().await;
    assert_eq!(backend.counts(), (0, 0, 1));
}

#[tokio::test]
async fn locked_gate_offers_price_dependent_action() {
    let backend = FakeBackend::default();
    let session = signed_in().await;

    let mut free = AccessGate::new(free_course(), backend.clone(), session.handle());
    assert_eq!(free.refresh().await, GateState::Locked);
    let view = free.view();
    assert!(!view.syllabus_unlocked);
    assert!(view.preview_playable);
    assert_eq!(view.call_to_action.unwrap().label, "Enroll Now");

    let mut paid = AccessGate::new(paid_course(), backend.clone(), session.handle());
    paid.refresh().await;
    let view = paid.view();
    assert!(!view.preview_playable);
    assert_eq!(view.call_to_action.unwrap().label, "Buy Now");
}

#[tokio::test]
async fn anonymous_gate_never_looks_up_enrollment() {
    let backend = FakeBackend::default().with_enrollment("42");
    let session = session_manager();
    let mut gate = AccessGate::new(paid_course(), backend.clone(), session.handle());

    assert_eq!(gate.refresh().await, GateState::Locked);
    assert_eq!(backend.counts(), (0, 0, 0));
}

#[tokio::test]
async fn anonymous_free_grant_leaves_syllabus_locked() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = session_manager();
    let mut gate = AccessGate::new(free_course(), backend.clone(), session.handle());

    let (_flow, ticket) = gate.request_access(&orch, StartOptions::default());
    let result = ticket.wait().await;

    assert!(result.success);
    assert_eq!(gate.apply(&result), GateState::Locked);
    assert!(gate.view().preview_playable);
    assert!(!gate.view().syllabus_unlocked);
}

#[tokio::test]
async fn gate_flips_without_refetch_and_relocks_on_sign_out() {
    let backend = FakeBackend::default();
    let orch = orchestrator(&backend);
    let session = signed_in().await;
    let mut gate = AccessGate::new(free_course(), backend.clone(), session.handle());
    assert_eq!(gate.refresh().await, GateState::Locked);

    let (mut flow, ticket) = gate.request_access(&orch, StartOptions::default());
    flow.submit().await.unwrap();
    assert_eq!(gate.apply(&ticket.wait().await), GateState::Unlocked);
    assert_eq!(backend.counts().2, 1);

    session.sign_out();
    assert_eq!(gate.state(), GateState::Locked);
    assert_eq!(gate.enrollment(), None);
}
