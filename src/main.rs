use clap::Parser;
use credential_verifier::{Config, CredentialVerifier, Verification};
use mimalloc::MiMalloc;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Check one login/secret pair against the configured users table.
#[derive(Parser, Debug)]
#[command(name = "credential-verifier")]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    login: String,

    #[arg(long, env = "VERIFIER_SECRET", hide_env_values = true)]
    secret: String,

    /// Report rejected and unavailable separately
    #[arg(long)]
    detailed: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.redacted_database_url(),
        table = %cfg.table.name,
        loglevel = %cfg.loglevel
    );

    let verifier = match CredentialVerifier::new(&cfg) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "invalid verifier configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let outcome = verifier.verify_detailed(&cli.login, &cli.secret).await;
    if cli.detailed {
        println!("{outcome}");
    } else {
        println!("{}", outcome.is_authenticated());
    }
    ExitCode::from(exit_code(&outcome, cli.detailed))
}

const EXIT_REJECTED: u8 = 1;
const EXIT_UNAVAILABLE: u8 = 2;
const EXIT_CONFIG: u8 = 3;

/// Without `--detailed` an unavailable datastore looks like a rejection.
fn exit_code(outcome: &Verification, detailed: bool) -> u8 {
    match outcome {
        Verification::Authenticated { .. } => 0,
        Verification::Rejected => EXIT_REJECTED,
        Verification::Unavailable if detailed => EXIT_UNAVAILABLE,
        Verification::Unavailable => EXIT_REJECTED,
    }
}
