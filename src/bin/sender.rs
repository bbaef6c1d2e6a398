//! Synthetic Hand Sender
//!
//! Streams two animated hands to a receiver for development without a
//! camera or tracker.
//!
//! Usage: `sender [target_addr] [rate_hz]`

use anyhow::{Context, Result};
use std::f64::consts::TAU;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hand_pose_receiver::{
    codec::{Frame, Hand},
    constants::DEFAULT_UDP_PORT,
    network::FrameSender,
};

/// Landmark offsets of a relaxed open right hand, wrist at the origin
const OPEN_HAND: [(f64, f64); 21] = [
    (0.000, 0.000),
    (-0.040, -0.030),
    (-0.070, -0.070),
    (-0.090, -0.100),
    (-0.110, -0.125),
    (-0.030, -0.120),
    (-0.035, -0.170),
    (-0.038, -0.200),
    (-0.040, -0.225),
    (0.000, -0.125),
    (0.000, -0.180),
    (0.000, -0.215),
    (0.000, -0.240),
    (0.028, -0.118),
    (0.030, -0.168),
    (0.032, -0.200),
    (0.034, -0.222),
    (0.052, -0.105),
    (0.058, -0.140),
    (0.062, -0.162),
    (0.065, -0.180),
];

/// One hand at time `t`, waving around `center_x`
fn synthetic_hand(hand_index: u8, center_x: f64, t: f64) -> Result<Hand> {
    let phase = t * TAU * 0.5 + hand_index as f64 * 0.7;
    let sway = phase.sin() * 0.05;
    let (sin, cos) = (phase.sin() * 0.3).sin_cos();
    let mirror = if hand_index == 0 { 1.0 } else { -1.0 };

    let positions = OPEN_HAND.iter().enumerate().map(|(i, &(dx, dy))| {
        let dx = dx * mirror;
        let x = center_x + sway + dx * cos - dy * sin;
        let y = 0.75 + dx * sin + dy * cos;
        let z = -0.01 * i as f64 * (1.0 + (phase * 2.0).cos() * 0.5);
        (x, y, z)
    });

    Ok(Hand::from_positions(hand_index, positions)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Synthetic Hand Sender");

    let target_addr: SocketAddr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("127.0.0.1:{}", DEFAULT_UDP_PORT))
        .parse()
        .context("Invalid target address")?;
    let rate_hz: f64 = match std::env::args().nth(2) {
        Some(arg) => arg.parse().context("Invalid rate")?,
        None => 30.0,
    };
    anyhow::ensure!(rate_hz > 0.0 && rate_hz <= 1000.0, "rate must be in (0, 1000] Hz");

    let mut sender = FrameSender::new(target_addr)?;
    tracing::info!("Sending to {} at {} Hz - press Ctrl+C to stop", target_addr, rate_hz);

    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / rate_hz));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let start_time = Instant::now();
    let mut last_stats_time = Instant::now();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {}
        }

        let t = start_time.elapsed().as_secs_f64();
        let frame = Frame::new(vec![synthetic_hand(0, 0.35, t)?, synthetic_hand(1, 0.65, t)?])?;

        if let Err(e) = sender.send(&frame) {
            tracing::warn!("Failed to send frame: {}", e);
        }

        // Periodic stats logging
        if last_stats_time.elapsed() >= Duration::from_secs(5) {
            last_stats_time = Instant::now();
            tracing::info!(
                "Stats: {} frames sent, {:.1} KB sent",
                sender.frames_sent(),
                sender.bytes_sent() as f64 / 1024.0
            );
        }
    }

    tracing::info!("Sender stopped after {} frames", sender.frames_sent());
    Ok(())
}
