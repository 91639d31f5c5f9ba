//! Subcommand handlers.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use tracing::info;
use upskill_access::{
    AccessGate, CheckoutConfig, CheckoutState, GateState, Orchestrator, PaymentDetails,
    StartOptions,
};
use upskill_auth::{AuthConfig, JsonFileStore, SessionManager};
use upskill_core::api::{CourseApi, EngagementApi, EnrollmentApi};
use upskill_core::error::UpskillError;
use upskill_core::models::course::{Course, CourseQuery};
use upskill_core::models::engagement::{ContactSubmission, NewsletterSubscription};
use upskill_core::models::payment::PaymentMethod;
use upskill_core::validation;
use upskill_http::{
    ApiClient, ApiConfig, HttpAuthApi, HttpCourseApi, HttpEngagementApi, HttpEnrollmentApi,
    HttpPaymentApi,
};

use crate::cli::{Cli, Commands};
use crate::error::{CliError, CliResult};

type Session = SessionManager<HttpAuthApi, JsonFileStore>;

struct Context {
    client: ApiClient,
    session: Session,
    json: bool,
}

pub async fn run(cli: Cli) -> CliResult<()> {
    let mut config = ApiConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    let client = ApiClient::new(&config).map_err(UpskillError::from)?;

    let store_path = store_path(cli.store)?;
    let session = SessionManager::new(
        HttpAuthApi::new(client.clone()),
        JsonFileStore::new(store_path),
        AuthConfig::default(),
    );
    let phase = session.hydrate();
    info!(base_url = %client.base_url(), phase = ?phase, "Client ready");

    let ctx = Context {
        client,
        session,
        json: cli.json,
    };

    match cli.command {
        Commands::Courses {
            category,
            price,
            search,
            limit,
            offset,
        } => {
            let query = CourseQuery {
                category,
                price,
                search,
                limit,
                offset,
            };
            ctx.courses(query).await
        }
        Commands::Course { id } => ctx.course(&id).await,
        Commands::Signup {
            email,
            password,
            name,
            accept_terms,
        } => ctx.sign_up(&email, &password, name.as_deref(), accept_terms).await,
        Commands::Login { email, password } => ctx.sign_in(&email, &password).await,
        Commands::Logout => {
            ctx.session.sign_out();
            println!("Signed out.");
            Ok(())
        }
        Commands::Whoami => ctx.whoami(),
        Commands::Enrollments => ctx.enrollments().await,
        Commands::Enroll {
            id,
            method,
            upi_id,
            email,
            password,
        } => {
            let credentials = email.zip(password);
            ctx.enroll(&id, method, upi_id, credentials).await
        }
        Commands::Subscribe { email } => ctx.subscribe(&email).await,
        Commands::Contact {
            first_name,
            last_name,
            email,
            message,
        } => {
            ctx.contact(ContactSubmission {
                first_name,
                last_name,
                email,
                message,
            })
            .await
        }
    }
}

fn store_path(explicit: Option<PathBuf>) -> CliResult<PathBuf> {
    explicit.or_else(JsonFileStore::default_path).ok_or_else(|| {
        CliError::Usage("No config directory available; pass --store <FILE>".into())
    })
}

/// Credentials given on the command line mean the caller wants a real
/// enrollment, so a free course must not short-circuit past sign-in.
fn start_options(has_credentials: bool) -> StartOptions {
    StartOptions {
        skip_auth_for_free: !has_credentials,
    }
}

fn price_label(course: &Course) -> String {
    if course.is_free() {
        "Free".into()
    } else {
        format!("{:.2}", course.price)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| UpskillError::Internal(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

impl Context {
    fn courses_api(&self) -> HttpCourseApi {
        HttpCourseApi::new(self.client.clone())
    }

    fn enrollments_api(&self) -> HttpEnrollmentApi {
        HttpEnrollmentApi::new(self.client.clone())
    }

    fn require_token(&self) -> CliResult<String> {
        self.session
            .handle()
            .token()
            .ok_or_else(|| CliError::Usage("Please sign in first (upskill login).".into()))
    }

    async fn courses(&self, query: CourseQuery) -> CliResult<()> {
        let courses = self.courses_api().list(query).await?;
        if self.json {
            return print_json(&courses);
        }
        if courses.is_empty() {
            println!("No courses found.");
        }
        for course in &courses {
            println!("{}\t{}\t{}", course.id, course.title, price_label(course));
        }
        Ok(())
    }

    async fn course(&self, id: &str) -> CliResult<()> {
        let course = self.courses_api().get(id).await?;
        let mut gate = AccessGate::new(course, self.enrollments_api(), self.session.handle());
        gate.refresh().await;
        let view = gate.view();

        if self.json {
            return print_json(&json!({
                "course": gate.course(),
                "syllabusUnlocked": view.syllabus_unlocked,
                "previewPlayable": view.preview_playable,
                "callToAction": view.call_to_action.as_ref().map(|cta| cta.label),
                "enrollment": gate.enrollment(),
            }));
        }

        let course = gate.course();
        println!("{} ({})", course.title, price_label(course));
        if let Some(description) = &course.description {
            println!("{description}");
        }
        if let Some(instructor) = &course.instructor {
            println!("Instructor: {instructor}");
        }
        if view.syllabus_unlocked {
            println!("Content: unlocked");
        } else {
            println!("Content: locked");
        }
        println!(
            "Preview: {}",
            if view.preview_playable { "available" } else { "locked" }
        );
        if let Some(cta) = view.call_to_action {
            println!("{} with: upskill enroll {}", cta.label, cta.course_id);
        }
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
        accepted_terms: bool,
    ) -> CliResult<()> {
        validation::validate_sign_up(email, password, name, accepted_terms)?;
        let user = self.session.sign_up(email, password, name).await?;
        println!("Welcome, {}!", user.display_name());
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> CliResult<()> {
        validation::validate_sign_in(email, password)?;
        let user = self.session.sign_in(email, password).await?;
        println!("Signed in as {}.", user.display_name());
        Ok(())
    }

    fn whoami(&self) -> CliResult<()> {
        let Some(user) = self.session.handle().user() else {
            if self.json {
                return print_json(&json!(null));
            }
            println!("Not signed in.");
            return Ok(());
        };
        if self.json {
            return print_json(&user);
        }
        println!("{} <{}>", user.display_name(), user.email);
        for membership in &user.organizations {
            println!("  {} ({:?})", membership.name, membership.role);
        }
        Ok(())
    }

    async fn enrollments(&self) -> CliResult<()> {
        let token = self.require_token()?;
        let enrollments = self.enrollments_api().list_mine(&token).await?;
        if self.json {
            return print_json(&enrollments);
        }
        if enrollments.is_empty() {
            println!("No enrollments yet.");
        }
        for enrollment in &enrollments {
            println!(
                "{}\t{:?}\t{:.0}%",
                enrollment.course_id, enrollment.payment_status, enrollment.progress
            );
        }
        Ok(())
    }

    async fn enroll(
        &self,
        course_id: &str,
        method: Option<PaymentMethod>,
        upi_id: Option<String>,
        credentials: Option<(String, String)>,
    ) -> CliResult<()> {
        let course = self.courses_api().get(course_id).await?;
        let mut gate = AccessGate::new(course, self.enrollments_api(), self.session.handle());
        if gate.refresh().await == GateState::Unlocked {
            println!("You already have access to {}.", gate.course().title);
            return Ok(());
        }

        let orchestrator = Orchestrator::new(
            self.enrollments_api(),
            HttpPaymentApi::new(self.client.clone()),
            CheckoutConfig::default(),
        );
        let (mut flow, ticket) =
            gate.request_access(&orchestrator, start_options(credentials.is_some()));

        if *flow.state() == CheckoutState::AuthRequired {
            let Some((email, password)) = credentials else {
                flow.close();
                return Err(CliError::Usage(
                    "Please sign in to continue (pass --email and --password, or run upskill login)."
                        .into(),
                ));
            };
            validation::validate_sign_in(&email, &password)?;
            if let Err(err) = self.session.sign_in(&email, &password).await {
                flow.close();
                return Err(err.into());
            }
            flow.resume();
        }

        if *flow.state() == CheckoutState::Checkout {
            if flow.requires_payment() {
                let method = method.ok_or_else(|| {
                    CliError::Usage(
                        "This is a paid course; choose --method card|upi|netbanking|wallet.".into(),
                    )
                })?;
                println!(
                    "Paying {} for {} with {}...",
                    price_label(flow.course()),
                    flow.course().title,
                    method.label()
                );
                flow.select_payment(PaymentDetails { method, upi_id });
            }
            flow.submit().await?;
        }

        match flow.state().clone() {
            CheckoutState::Success { message } => {
                println!("{message}");
                flow.close();
            }
            CheckoutState::Closed => {}
            CheckoutState::Error { message } => {
                flow.close();
                return Err(CliError::Declined(message));
            }
            other => {
                flow.close();
                return Err(CliError::Declined(format!(
                    "Enrollment did not complete ({other:?})."
                )));
            }
        }

        let result = ticket.wait().await;
        if !result.success {
            return Err(CliError::Declined(
                result.error.unwrap_or_else(|| "Enrollment was cancelled.".into()),
            ));
        }
        match gate.apply(&result) {
            GateState::Unlocked => println!("Course content unlocked."),
            GateState::Locked => println!("Free preview available. Sign in and enroll to track progress."),
        }
        Ok(())
    }

    async fn subscribe(&self, email: &str) -> CliResult<()> {
        validation::validate_email(email)?;
        let response = HttpEngagementApi::new(self.client.clone())
            .subscribe_newsletter(NewsletterSubscription {
                email: email.to_string(),
            })
            .await?;
        println!("{}", response.message);
        Ok(())
    }

    async fn contact(&self, submission: ContactSubmission) -> CliResult<()> {
        validation::validate_contact(&submission)?;
        let receipt = HttpEngagementApi::new(self.client.clone())
            .submit_contact(submission)
            .await?;
        println!("{}", receipt.message);
        Ok(())
    }
}
