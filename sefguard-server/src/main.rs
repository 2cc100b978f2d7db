mod api;
mod config;
mod driver;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use hyper::Server;
use hyper::service::{make_service_fn, service_fn};
use sefguard_core::{
    CompanionStore, Dataset, JourneySession, Progress, ScoreRequest, TransportMode,
    TransportProfile,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use driver::{ConsoleObserver, DriverOptions};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Walking,
    Auto,
    Cab,
}

impl From<ModeArg> for TransportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Walking => Self::Walking,
            ModeArg::Auto => Self::Auto,
            ModeArg::Cab => Self::Cab,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "sefguard", version)]
#[command(about = "SEF Guard stub safety API and journey simulator")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the stub safety API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// JSON dataset to serve instead of the built-in seed data
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Run one journey in real time and print its timeline
    Simulate {
        /// Transport mode for the journey
        #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
        mode: ModeArg,

        /// Logical seconds per wall-clock second
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Host timer period in milliseconds
        #[arg(long, default_value_t = 100)]
        poll_ms: u64,

        /// Raise an emergency once progress reaches this percentage
        #[arg(long)]
        emergency_at: Option<u8>,

        /// JSON clock pacing overrides
        #[arg(long)]
        clock_config: Option<PathBuf>,

        /// Start in night mode
        #[arg(long)]
        night: bool,

        /// Journey origin (informational)
        #[arg(long, default_value = "Whitefield")]
        from: String,

        /// Journey destination (informational)
        #[arg(long, default_value = "Hoodi Circle")]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();

    match args.command {
        Command::Serve { bind, dataset } => {
            let dataset = config::load_dataset(dataset.as_deref())?;
            serve(bind, dataset).await
        }
        Command::Simulate {
            mode,
            speed,
            poll_ms,
            emergency_at,
            clock_config,
            night,
            from,
            to,
        } => {
            let clock = config::load_clock_config(clock_config.as_deref())?;
            let mut session = JourneySession::new(clock);
            session.set_transport_mode(mode.into());
            if night {
                session.toggle_environment_mode();
            }
            let options = DriverOptions {
                poll: Duration::from_millis(poll_ms),
                speed,
                emergency_at: emergency_at.map(Progress::from),
            };
            simulate(session, options, &from, &to).await
        }
    }
}

fn announce_banner() {
    println!("{}", "🛡️  SEF Guard".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

async fn serve(bind: SocketAddr, dataset: Dataset) -> Result<()> {
    let store = Arc::new(dataset);
    let make_svc = make_service_fn(move |_conn| {
        let store = Arc::clone(&store);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| api::handle(Arc::clone(&store), req)))
        }
    });

    let server = Server::try_bind(&bind)
        .with_context(|| format!("binding {bind}"))?
        .serve(make_svc);
    println!(
        "{} http://{}",
        "Listening on".bright_green().bold(),
        server.local_addr()
    );
    log::info!("serving stub safety API on {}", server.local_addr());

    server
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_err() {
                log::warn!("could not install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
            log::info!("shutting down");
        })
        .await
        .context("server error")
}

async fn simulate(
    mut session: JourneySession,
    options: DriverOptions,
    from: &str,
    to: &str,
) -> Result<()> {
    let mode = session.state().transport_mode;
    let profile = TransportProfile::for_mode(mode);
    println!("{} {from} -> {to}", "Route".bright_yellow().bold());
    match (profile.driver, profile.pickup_eta) {
        (Some(driver), Some(eta)) => {
            println!("{} {} with {driver}, pickup in {eta}", "Ride".yellow(), profile.name);
        }
        _ => println!("{} {}", "Ride".yellow(), profile.name),
    }

    let request = ScoreRequest::from_query(Some(from), Some(to), Some(mode.as_str()))?;
    let Ok(score) = Dataset::seed().journey_safety_score(&request);
    println!(
        "{} {} ({}), {} responders, {} safe havens",
        "Safety score".yellow(),
        score.score,
        score.rating,
        score.responder_count,
        score.safe_havens_count
    );
    println!("{}", "-".repeat(32).yellow());

    session.subscribe(Box::new(ConsoleObserver::new(std::io::stdout())));
    let finished = driver::drive(&mut session, options).await?;

    println!("{}", "-".repeat(32).yellow());
    println!(
        "{} {} at {} after {:.1}s logical time",
        "Arrived".bright_green().bold(),
        finished.step.label(),
        finished.progress,
        session.clock().now().as_secs_f64()
    );
    if finished.is_emergency {
        println!(
            "{} status {}",
            "Emergency still active,".red().bold(),
            finished.effective_safety_status()
        );
    }
    Ok(())
}
