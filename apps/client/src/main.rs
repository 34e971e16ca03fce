use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use career_metric::api_client::ScoringApiClient;
use career_metric::config::Config;
use career_metric::dashboard::render_report;
use career_metric::health::{HealthMonitor, POLL_INTERVAL_SECS};
use career_metric::models::assessment::AssessmentInput;
use career_metric::models::user::UserRegistration;
use career_metric::scoring::ReadinessScorer;
use career_metric::session::{SessionContext, SessionStore};
use career_metric::submission::SubmissionFlow;

#[derive(Parser, Debug)]
#[command(
    name = "career-metric",
    about = "Blend academic, technical, soft skill, experience and portfolio signals into one readiness score",
    version
)]
struct Cli {
    /// Scoring service base URL (overrides CAREER_METRIC_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Session file location (overrides CAREER_METRIC_SESSION_PATH)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a readiness score (remote when signed in, local otherwise)
    Score(ScoreArgs),
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Create an account, then sign in
    Register(RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Check whether the scoring service is reachable
    Health {
        /// Keep polling every 30 seconds
        #[arg(long)]
        watch: bool,
    },
    /// Show the signed-in account and profile
    Whoami,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Academic index (30-100)
    #[arg(long, default_value_t = 75.0)]
    academic: f64,
    /// Technical depth (30-100)
    #[arg(long, default_value_t = 80.0)]
    technical: f64,
    /// Soft skills (30-100)
    #[arg(long, default_value_t = 70.0)]
    soft_skills: f64,
    /// Industry experience in years (0-20)
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    experience: i64,
    #[arg(long)]
    github: Option<String>,
    #[arg(long)]
    linkedin_headline: Option<String>,
    /// Competitive programming ratings, comma-separated
    #[arg(long, default_value = "")]
    cp_ratings: String,
    /// Resume file; only its name is sent
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Skip the scoring service even when signed in
    #[arg(long)]
    local: bool,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "CAREER_METRIC_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[command(flatten)]
    credentials: LoginArgs,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    headline: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    if let Some(path) = cli.session_file.clone() {
        config.session_path = path;
    }

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("career_metric={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Career Metric client v{}", env!("CARGO_PKG_VERSION"));

    let api = ScoringApiClient::new(&config.api_url)
        .with_context(|| format!("Invalid scoring service URL '{}'", config.api_url))?;
    let mut ctx = SessionContext::new(SessionStore::new(&config.session_path));

    match cli.command {
        Command::Score(args) => run_score(&api, &mut ctx, args).await,
        Command::Login(args) => {
            let profile = ctx.sign_in(&api, &args.email, &args.password).await?;
            println!("Signed in as {}. Profile {}.", args.email, profile.id);
            print_status(&ctx);
            Ok(())
        }
        Command::Register(args) => {
            let registration = UserRegistration {
                email: args.credentials.email.clone(),
                password: args.credentials.password,
                full_name: args.full_name,
                headline: args.headline,
            };
            let profile = ctx.register(&api, &registration).await?;
            println!(
                "Registered {}. Profile {}.",
                args.credentials.email, profile.id
            );
            print_status(&ctx);
            Ok(())
        }
        Command::Logout => {
            ctx.clear()?;
            println!("Signed out.");
            Ok(())
        }
        Command::Health { watch } => run_health(&api, watch).await,
        Command::Whoami => run_whoami(&api, &mut ctx).await,
    }
}

async fn run_score(api: &ScoringApiClient, ctx: &mut SessionContext, args: ScoreArgs) -> Result<()> {
    let mut input = AssessmentInput::new(args.academic, args.technical, args.soft_skills, args.experience)
        .with_cp_ratings(&args.cp_ratings);
    if let Some(github) = args.github {
        input = input.with_github(github);
    }
    if let Some(headline) = args.linkedin_headline {
        input = input.with_linkedin_headline(headline);
    }
    if let Some(name) = args
        .resume
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
    {
        input = input.with_resume(name);
    }

    let session = if args.local {
        None
    } else {
        ctx.restore_for_scoring(api).await
    };

    let flow = SubmissionFlow::new(ReadinessScorer::new(Arc::new(api.clone())));
    let submission = flow.submit(&input, session.as_ref()).await;

    if args.json {
        let body = json!({
            "state": submission.state,
            "advisory": submission.outcome.advisory(),
            "summary": submission.outcome.summary(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print_status(ctx);
        print!("{}", render_report(submission.outcome.summary()));
        println!();
        println!("{}", submission.outcome.advisory());
    }
    Ok(())
}

async fn run_health(api: &ScoringApiClient, watch: bool) -> Result<()> {
    let mut monitor = HealthMonitor::default();
    if !watch {
        monitor.refresh(api).await;
        println!("{}", monitor.pill());
        return Ok(());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));
    loop {
        interval.tick().await;
        monitor.refresh(api).await;
        println!("{}", monitor.pill());
    }
}

async fn run_whoami(api: &ScoringApiClient, ctx: &mut SessionContext) -> Result<()> {
    ctx.restore(api).await?;
    let (Some(session), Some(profile)) = (ctx.session(), ctx.profile()) else {
        println!("{}", ctx.status().unwrap_or("Not signed in."));
        return Ok(());
    };

    let user = api.me(&session.token).await.context("Unable to load account")?;
    println!("{} ({})", user.email, user.full_name.as_deref().unwrap_or("no name"));
    println!(
        "Primary role: {}",
        profile.target_role.as_deref().unwrap_or("-")
    );
    println!(
        "Education: {}",
        profile.highest_education.as_deref().unwrap_or("-")
    );
    println!("Experience: {} yrs", profile.years_experience.unwrap_or(0.0));
    Ok(())
}

fn print_status(ctx: &SessionContext) {
    if let Some(status) = ctx.status() {
        eprintln!("{status}");
    }
}
