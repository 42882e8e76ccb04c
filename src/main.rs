use anyhow::Result;
use external_dns_webhook::Config;
use is_terminal::IsTerminal;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = config_init(std::env::args().nth(1))?;

    if std::io::stdout().is_terminal() {
        println!("{}", external_dns_webhook::banner::render());
    }

    let provider = config.provider().await?;
    external_dns_webhook::serve(&config, provider, shutdown_signal()).await?;

    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "external_dns_webhook=info,tower_http=info".into()),
        )
        .init();
}

fn config_init(config_file: Option<String>) -> Result<Config> {
    match config_file {
        None => {
            tracing::debug!("loading config from environment");
            Ok(Config::from_env()?)
        }
        Some(config_file) => {
            tracing::debug!("loaded config from {config_file}");
            Ok(Config::try_from_file(&config_file)?)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("quitting from signal, draining in-flight requests");
}
