//! The backend contract, as consumed by the client.
//!
//! All operations are async. Operations on a user's own data take the
//! bearer token explicitly; implementations send it as
//! `Authorization: Bearer <token>`. Every failure arrives as an
//! [`UpskillError`](crate::error::UpskillError) whose message is fit
//! for display.

use crate::error::UpskillResult;
use crate::models::{
    auth::{AuthResponse, SignInRequest, SignUpRequest},
    course::{Course, CourseQuery},
    engagement::{ContactReceipt, ContactSubmission, MessageResponse, NewsletterSubscription},
    enrollment::{CreateEnrollment, Enrollment},
    payment::{CreatePayment, Payment},
};

pub trait AuthApi: Send + Sync {
    /// `POST /auth/signup`
    fn sign_up(
        &self,
        input: SignUpRequest,
    ) -> impl Future<Output = UpskillResult<AuthResponse>> + Send;
    /// `POST /auth/login`
    fn sign_in(
        &self,
        input: SignInRequest,
    ) -> impl Future<Output = UpskillResult<AuthResponse>> + Send;
}

pub trait CourseApi: Send + Sync {
    /// `GET /courses`
    fn list(&self, query: CourseQuery) -> impl Future<Output = UpskillResult<Vec<Course>>> + Send;
    /// `GET /courses/:id`
    fn get(&self, id: &str) -> impl Future<Output = UpskillResult<Course>> + Send;
}

pub trait EnrollmentApi: Send + Sync {
    /// `POST /enrollments`. Fails with "Already enrolled in this course"
    /// when the enrollment exists.
    fn create(
        &self,
        token: &str,
        input: CreateEnrollment,
    ) -> impl Future<Output = UpskillResult<Enrollment>> + Send;
    /// `GET /enrollments/:courseId`. A 404 means "not enrolled".
    fn get_by_course(
        &self,
        token: &str,
        course_id: &str,
    ) -> impl Future<Output = UpskillResult<Enrollment>> + Send;
    /// `GET /enrollments`
    fn list_mine(&self, token: &str) -> impl Future<Output = UpskillResult<Vec<Enrollment>>> + Send;
}

pub trait PaymentApi: Send + Sync {
    /// `POST /payments`. On success the backend materializes the
    /// enrollment for the paid course.
    fn create(
        &self,
        token: &str,
        input: CreatePayment,
    ) -> impl Future<Output = UpskillResult<Payment>> + Send;
}

pub trait EngagementApi: Send + Sync {
    /// `POST /newsletter/subscribe`
    fn subscribe_newsletter(
        &self,
        input: NewsletterSubscription,
    ) -> impl Future<Output = UpskillResult<MessageResponse>> + Send;
    /// `POST /contact`
    fn submit_contact(
        &self,
        input: ContactSubmission,
    ) -> impl Future<Output = UpskillResult<ContactReceipt>> + Send;
}
