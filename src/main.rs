use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nudge::{api, config::Config, notify, sched::Scheduler, store::Store};

#[derive(Parser)]
#[command(name = "nudge")]
#[command(about = "Task lists with scheduled email reminders")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the nudge server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "nudge=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let port = match cli.command {
        Some(Commands::Serve { port }) => port,
        // Default: start server on the usual port
        None => 3000,
    };

    serve(port).await
}

async fn serve(port: u16) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let store = match &config.data_dir {
        Some(dir) => Store::open(dir.clone())?,
        None => Store::open_default()?,
    };

    let notifier = notify::from_config(&config);
    let scheduler = Scheduler::start(config.timezone, store.clone(), notifier);

    let app = api::create_router(store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("nudge server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // In-flight reminder dispatches finish before we exit.
    scheduler.shutdown().await;

    Ok(())
}
