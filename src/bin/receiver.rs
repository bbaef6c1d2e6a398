//! Hand Pose Receiver Application
//!
//! Listens for landmark datagrams and drives the smoothing session from a
//! fixed interval timer until Ctrl+C.
//!
//! Usage: `receiver [config.toml]`

use anyhow::Result;
use crossbeam_channel::bounded;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hand_pose_receiver::{
    config::AppConfig,
    protocol::{ControlMessage, SharedStatus},
    session::Session,
    sink::LogSink,
    ui::WebServer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hand Pose Receiver");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;

    let mut session = Session::new(&config)?;

    let (control_tx, control_rx) = bounded::<ControlMessage>(64);
    let status: SharedStatus = Arc::new(RwLock::new(session.status()));

    let _web_handle = if config.ui.enabled {
        let web_server = WebServer::new(config.ui.clone(), status.clone(), control_tx.clone());
        Some(web_server.start_background())
    } else {
        None
    };

    let mut sink = LogSink::new();
    let mut interval = tokio::time::interval(config.tick.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut last_stats_time = Instant::now();

    tracing::info!("Tick loop running every {:?} - press Ctrl+C to stop", config.tick.interval());

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }
            _ = interval.tick() => {}
        }

        // Apply pending control commands
        while let Ok(message) = control_rx.try_recv() {
            if let Err(e) = session.handle_control(message, &mut sink) {
                tracing::warn!("Rejected control command: {}", e);
            }
        }

        session.tick(&mut sink);

        if config.ui.enabled {
            *status.write() = session.status();
        }

        // Periodic stats
        if last_stats_time.elapsed() >= Duration::from_secs(5) {
            last_stats_time = Instant::now();

            let stats = session.stats();
            let recv_stats = session.receiver_stats();
            tracing::info!(
                "Receiver stats: {} datagrams, {} bytes, {} oversized, {} errors",
                recv_stats.datagrams_received,
                recv_stats.bytes_received,
                recv_stats.oversized_datagrams,
                recv_stats.receive_errors
            );
            tracing::info!(
                "Session stats: {} frames, {} dropped, {} hands rejected, {} entities tracked",
                stats.frames_decoded,
                stats.decode_errors,
                stats.hands_rejected,
                session.registry().len()
            );
        }
    }

    session.stop();
    tracing::info!("Receiver stopped after {} transforms", sink.applied());
    Ok(())
}
