//! Storyvoice Entry Point
//!
//! Interactive mode plays one story on the terminal; `--bridge` serves the
//! chat bridge over HTTP instead.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use storyvoice_agent::{SessionError, StorySession};
use storyvoice_config::{load_settings, Settings};
use storyvoice_server::exit::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use storyvoice_server::interactive::{show_actors, show_transcript};
use storyvoice_server::{
    create_router, fatal_report, run_interactive, Cli, Farewell, Services, TermIo, UserIo,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli.settings_source()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Configuration error: {}", e);
            return exit_code(EXIT_CONFIG);
        }
    };

    init_tracing(&settings);
    tracing::info!("Starting storyvoice v{}", env!("CARGO_PKG_VERSION"));

    let code = if cli.bridge {
        match serve_bridge(&settings).await {
            Ok(()) => EXIT_OK,
            Err(e) => {
                eprintln!("{:#}", e);
                EXIT_CONFIG
            }
        }
    } else {
        play(&settings).await
    };
    exit_code(code)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}

/// Interactive story on the terminal; returns the process exit code
async fn play(settings: &Settings) -> i32 {
    let scene = match settings.scene_text() {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EXIT_CONFIG;
        }
    };
    let services = match Services::from_settings(settings) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EXIT_CONFIG;
        }
    };
    let mut io = match TermIo::new(settings.prompt.clone()) {
        Ok(io) => io,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_FATAL;
        }
    };

    let mut session = services.session(settings);
    let story = run_story(&mut session, &scene, &services, &mut io);

    let outcome = tokio::select! {
        outcome = story => outcome,
        _ = tokio::signal::ctrl_c() => Ok(Farewell::Interrupted),
    };

    match outcome {
        Ok(farewell) => {
            println!("{}", farewell.message());
            EXIT_OK
        }
        Err(e) => {
            tracing::error!(error = %e, "Session ended");
            for line in fatal_report(&e) {
                println!("{}", line);
            }
            EXIT_FATAL
        }
    }
}

async fn run_story(
    session: &mut StorySession,
    scene: &str,
    services: &Services,
    io: &mut dyn UserIo,
) -> Result<Farewell, SessionError> {
    session.start(scene).await?;
    show_transcript(session, io);
    show_actors(session, io);
    run_interactive(
        session,
        services.listener.as_ref(),
        services.speaker.as_ref(),
        io,
    )
    .await
}

async fn serve_bridge(settings: &Settings) -> anyhow::Result<()> {
    let default_scene = settings.default_bridge_scene()?;
    if default_scene.is_none() {
        tracing::warn!("No default scene; conversations must start with /reset <scene>");
    }
    let services = Services::from_settings(settings)?;
    let bridge = Arc::new(services.bridge(settings, default_scene));

    let app = create_router(bridge);
    let addr: SocketAddr = format!("{}:{}", settings.bridge.host, settings.bridge.port).parse()?;
    tracing::info!("Bridge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Bridge shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Initialize tracing on stderr so stdout carries only the story
fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("storyvoice={},tower_http=info", settings.log_level()).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
