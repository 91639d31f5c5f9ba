//! UpSkillHub Access: decides whether a course's protected content may
//! be shown, and drives the enroll/buy flow that grants access.

pub mod checkout;
pub mod config;
pub mod gate;

pub use checkout::{
    AccessResult, AccessTicket, CheckoutState, EnrollmentFlow, Orchestrator, PaymentDetails,
    StartOptions,
};
pub use config::CheckoutConfig;
pub use gate::{AccessGate, CallToAction, GateState, GateView, can_access_content};
