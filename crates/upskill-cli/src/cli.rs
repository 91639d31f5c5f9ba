//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use upskill_core::models::course::PriceFilter;
use upskill_core::models::payment::PaymentMethod;

#[derive(Parser, Debug)]
#[command(name = "upskill")]
#[command(author, version, about = "UpSkillHub course platform client", long_about = None)]
pub struct Cli {
    /// Backend base URL; overrides UPSKILL_API_URL
    /// (default: http://localhost:3001/api)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Session file (default: <config dir>/upskillhub/session.json)
    #[arg(long, env = "UPSKILL_STORE")]
    pub store: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the course catalog
    Courses {
        #[arg(long)]
        category: Option<String>,
        /// `free` or `paid`
        #[arg(long)]
        price: Option<PriceFilter>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show a course and whether its content is unlocked
    Course {
        /// Course ID
        id: String,
    },

    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "UPSKILL_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "UPSKILL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List your enrollments
    Enrollments,

    /// Enroll in a free course or buy a paid one
    Enroll {
        /// Course ID
        id: String,
        /// card, upi, netbanking or wallet (paid courses only)
        #[arg(long)]
        method: Option<PaymentMethod>,
        /// UPI ID, required with `--method upi`
        #[arg(long)]
        upi_id: Option<String>,
        /// Sign in first if there is no session
        #[arg(long, requires = "password")]
        email: Option<String>,
        #[arg(long, requires = "email")]
        password: Option<String>,
    },

    /// Subscribe to the newsletter
    Subscribe {
        email: String,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}
