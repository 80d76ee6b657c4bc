//! Command-line front end for the student portal stores.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use portal::PortalContext;
use portal::config::PortalSettings;
use portal::domain::ports::KeyValueStore;
use portal::domain::{CourseRef, LoginCredentials, PublicIdentity, RegistrationForm};
use portal::outbound::InMemoryKeyValueStore;

/// `portal` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "portal",
    about = "Register, sign in, and enroll against the local portal store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new account; does not sign in.
    Register(RegisterArgs),
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the persisted session.
    Logout,
    /// Show the signed-in identity, if any.
    Whoami,
    /// List registered identities without their passwords.
    Users,
    /// Select courses and commit them as the enrollment.
    Enroll {
        /// Course as `ID:NAME:CREDIT`; repeat to toggle several.
        #[arg(long = "course", value_name = "ID:NAME:CREDIT", value_parser = parse_course)]
        courses: Vec<CourseRef>,
    },
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
    #[arg(long, default_value = "")]
    mobile_number: String,
    /// One of `Male`, `Female`, or `Other`.
    #[arg(long, default_value = "")]
    gender: String,
    /// Date as `YYYY-MM-DD`.
    #[arg(long, default_value = "")]
    date_of_birth: String,
}

impl From<RegisterArgs> for RegistrationForm {
    fn from(args: RegisterArgs) -> Self {
        Self {
            full_name: args.full_name,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            mobile_number: args.mobile_number,
            gender: args.gender,
            date_of_birth: args.date_of_birth,
        }
    }
}

fn parse_course(raw: &str) -> Result<CourseRef, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(id), Some(name), Some(credit)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected ID:NAME:CREDIT, got `{raw}`"));
    };
    let credit = credit
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid credit `{credit}`: {err}"))?;
    CourseRef::try_from_parts(id, name, credit).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = PortalSettings::load_from_iter([OsString::from("portal")])
        .map_err(|err| eyre!("load portal settings: {err}"))?;
    let clock = Arc::new(DefaultClock);

    if settings.ephemeral {
        let context =
            PortalContext::start(Arc::new(InMemoryKeyValueStore::default()), clock);
        run(context, cli.command)
    } else {
        let context = PortalContext::from_settings(&settings, clock).map_err(|err| {
            eyre!(
                "open storage at {}: {err}",
                settings.storage_dir().display()
            )
        })?;
        run(context, cli.command)
    }
}

fn run<S: KeyValueStore>(mut context: PortalContext<S>, command: Command) -> Result<()> {
    match command {
        Command::Register(args) => {
            let new = RegistrationForm::from(args).validate()?;
            let public = context.session_mut().register(new)?;
            println!("registered {} <{}>", public.full_name(), public.email());
        }
        Command::Login { email, password } => {
            let credentials = LoginCredentials::try_from_parts(&email, &password)?;
            let public = context.session_mut().login(&credentials)?;
            println!("signed in as {}", describe(&public));
        }
        Command::Logout => {
            context.session_mut().logout();
            println!("signed out");
        }
        Command::Whoami => match context.session().current() {
            Some(public) => println!("{}", describe(public)),
            None => println!("not signed in"),
        },
        Command::Users => {
            for public in context.session().identities()? {
                println!("{} {}", public.id(), describe(&public));
            }
        }
        Command::Enroll { courses } => {
            if !context.session().is_authenticated() {
                return Err(eyre!("sign in before enrolling"));
            }
            let selection = context.selection_mut();
            for course in courses {
                selection.toggle_selection(course);
            }
            selection.commit_enrollment();
            for course in selection.enrolled() {
                println!("{} {} ({} credits)", course.id(), course.name(), course.credit());
            }
            println!("total credits: {}", selection.enrolled_credits());
        }
    }
    Ok(())
}

fn describe(public: &PublicIdentity) -> String {
    format!("{} <{}>", public.full_name(), public.email())
}
