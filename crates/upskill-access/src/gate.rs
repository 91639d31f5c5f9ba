//! Access gate for a course's protected content.
//!
//! The syllabus and the full lecture list open only for an
//! authenticated session holding an enrollment for the course. A free
//! course's preview stays playable either way, but being free never
//! counts as being enrolled.

use tracing::{debug, info, warn};
use upskill_auth::SessionHandle;
use upskill_core::api::{EnrollmentApi, PaymentApi};
use upskill_core::models::course::Course;
use upskill_core::models::enrollment::Enrollment;
use upskill_core::models::session::Session;

use crate::checkout::{AccessResult, AccessTicket, EnrollmentFlow, Orchestrator, StartOptions};

pub const ENROLL_LABEL: &str = "Enroll Now";
pub const BUY_LABEL: &str = "Buy Now";

/// Protected content is visible iff the session is authenticated and an
/// enrollment record for the course exists.
pub fn can_access_content(session: &Session, enrollment: Option<&Enrollment>) -> bool {
    session.is_authenticated() && enrollment.is_some()
}

/// `(course id, user id)` an enrollment lookup answers for; `None` unless
/// the session is authenticated.
fn session_key(course_id: &str, session: &Session) -> Option<(String, String)> {
    let user_id = session.bearer().and(session.user_id())?;
    Some((course_id.to_string(), user_id.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

/// The single action offered while the gate is locked.
#[derive(Debug, Clone, PartialEq)]
pub struct CallToAction {
    pub label: &'static str,
    pub course_id: String,
    pub price: f64,
}

/// What a course detail view may render.
#[derive(Debug, Clone, PartialEq)]
pub struct GateView {
    pub syllabus_unlocked: bool,
    pub preview_playable: bool,
    pub call_to_action: Option<CallToAction>,
}

pub struct AccessGate<E: EnrollmentApi> {
    course: Course,
    enrollments: E,
    session: SessionHandle,
    enrollment: Option<Enrollment>,
    /// `(course id, user id)` the enrollment lookup last answered for.
    checked_for: Option<(String, String)>,
}

impl<E: EnrollmentApi> AccessGate<E> {
    pub fn new(course: Course, enrollments: E, session: SessionHandle) -> Self {
        Self {
            course,
            enrollments,
            session,
            enrollment: None,
            checked_for: None,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    /// The enrollment the gate currently knows about, for the signed-in
    /// user.
    pub fn enrollment(&self) -> Option<&Enrollment> {
        self.enrollment_for(&self.session.snapshot())
    }

    /// The known enrollment, if it was looked up for `session`'s user.
    fn enrollment_for(&self, session: &Session) -> Option<&Enrollment> {
        match session_key(&self.course.id, session) {
            Some(key) if self.checked_for.as_ref() == Some(&key) => self.enrollment.as_ref(),
            _ => None,
        }
    }

    /// Look up the enrollment for the current user, once per course and
    /// user. A missing record (including a 404) locks the gate; other
    /// failures lock it too but are retried on the next refresh.
    pub async fn refresh(&mut self) -> GateState {
        let session = self.session.snapshot();
        let (Some(key), Some(token)) = (
            session_key(&self.course.id, &session),
            session.bearer().map(str::to_string),
        ) else {
            self.enrollment = None;
            self.checked_for = None;
            return GateState::Locked;
        };
        if self.checked_for.as_ref() == Some(&key) {
            return self.state();
        }

        match self.enrollments.get_by_course(&token, &self.course.id).await {
            Ok(enrollment) => {
                self.enrollment = Some(enrollment);
                self.checked_for = Some(key);
            }
            Err(err) if err.is_not_found() => {
                debug!(course_id = %self.course.id, "No enrollment, content stays locked");
                self.enrollment = None;
                self.checked_for = Some(key);
            }
            Err(err) => {
                warn!(course_id = %self.course.id, error = %err, "Enrollment lookup failed");
                self.enrollment = None;
                self.checked_for = None;
            }
        }
        self.state()
    }

    pub fn state(&self) -> GateState {
        let session = self.session.snapshot();
        if can_access_content(&session, self.enrollment_for(&session)) {
            GateState::Unlocked
        } else {
            GateState::Locked
        }
    }

    pub fn call_to_action(&self) -> CallToAction {
        CallToAction {
            label: if self.course.is_free() {
                ENROLL_LABEL
            } else {
                BUY_LABEL
            },
            course_id: self.course.id.clone(),
            price: self.course.price,
        }
    }

    pub fn view(&self) -> GateView {
        let unlocked = self.state() == GateState::Unlocked;
        GateView {
            syllabus_unlocked: unlocked,
            preview_playable: unlocked || self.course.is_free(),
            call_to_action: (!unlocked).then(|| self.call_to_action()),
        }
    }

    /// The call-to-action: start an enroll/buy flow for this course.
    pub fn request_access<'o, E2: EnrollmentApi, P: PaymentApi>(
        &self,
        orchestrator: &'o Orchestrator<E2, P>,
        options: StartOptions,
    ) -> (EnrollmentFlow<'o, E2, P>, AccessTicket) {
        orchestrator.start(self.course.clone(), &self.session, options)
    }

    /// Take in the outcome of an access request. A successful result
    /// carrying an enrollment unlocks the gate in place.
    pub fn apply(&mut self, result: &AccessResult) -> GateState {
        if let (true, Some(enrollment)) = (result.success, result.enrollment.as_ref()) {
            if let Some(key) = session_key(&self.course.id, &self.session.snapshot()) {
                info!(course_id = %self.course.id, "Course unlocked");
                self.enrollment = Some(enrollment.clone());
                self.checked_for = Some(key);
            }
        }
        self.state()
    }
}
