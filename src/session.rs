//! Receiving session
//!
//! The session is the single owner of the landmark socket and the joint
//! registry. The host drives it by calling [`Session::tick`] from a fixed
//! interval timer; a tick never blocks and never fails.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use nalgebra::{Quaternion, Vector3};
use std::net::SocketAddr;

use crate::codec::decode_with_report;
use crate::config::{validate_depth_scale, validate_factor, AppConfig};
use crate::error::{ConfigError, Result};
use crate::math::{CameraFrame, Projection, Quat};
use crate::network::{DatagramReceiver, ReceiverStats};
use crate::protocol::{ControlMessage, SessionStats, StatusSnapshot};
use crate::sink::OutputSink;
use crate::tracking::{update, Emission, JointRegistry, SmoothingConfig};

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No datagram pending
    Idle,
    /// A datagram arrived but could not be decoded
    Dropped,
    /// A frame was smoothed and handed to the sink
    Applied { hands: usize, emissions: usize },
}

/// Socket, smoothing state and settings of one receiving session
pub struct Session {
    receiver: DatagramReceiver,
    registry: JointRegistry,
    smoothing: SmoothingConfig,
    projection: Projection,
    stats: SessionStats,
    last_packet: Option<Bytes>,
    last_frame_at: Option<DateTime<Utc>>,
    last_emissions: Vec<Emission>,
}

impl Session {
    /// Bind the socket and prepare an empty registry
    ///
    /// This is the only fallible step; once it succeeds, ticks cannot fail.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let receiver = DatagramReceiver::bind(&config.network)?;

        Ok(Self {
            receiver,
            registry: JointRegistry::new(),
            smoothing: config.smoothing,
            projection: config.mapping.projection(),
            stats: SessionStats::default(),
            last_packet: None,
            last_frame_at: None,
            last_emissions: Vec::new(),
        })
    }

    /// One receive -> decode -> smooth -> emit cycle
    pub fn tick(&mut self, sink: &mut dyn OutputSink) -> TickOutcome {
        self.stats.ticks += 1;
        match self.receiver.poll() {
            Some(datagram) => self.process_datagram(datagram, sink),
            None => TickOutcome::Idle,
        }
    }

    /// Decode, smooth and emit a datagram obtained elsewhere
    ///
    /// A datagram that fails to decode leaves all tracking state untouched.
    pub fn process_datagram(&mut self, datagram: Bytes, sink: &mut dyn OutputSink) -> TickOutcome {
        let report = match decode_with_report(&datagram) {
            Ok(report) => report,
            Err(e) => {
                self.stats.decode_errors += 1;
                tracing::warn!("Dropped datagram: {}", e);
                return TickOutcome::Dropped;
            }
        };

        for rejection in &report.rejected {
            tracing::warn!("Dropped hand entry {}: {}", rejection.position, rejection.reason);
        }
        self.stats.hands_rejected += report.rejected.len() as u64;
        self.stats.frames_decoded += 1;

        let emissions = update(&report.frame, &mut self.registry, &self.smoothing, &self.projection);
        sink.apply(&emissions);

        let outcome = TickOutcome::Applied {
            hands: report.frame.len(),
            emissions: emissions.len(),
        };
        self.stats.emissions += emissions.len() as u64;
        self.last_packet = Some(datagram);
        self.last_frame_at = Some(Utc::now());
        self.last_emissions = emissions;
        outcome
    }

    /// Clear all tracking state, returning how many entities were dropped
    pub fn reset(&mut self, sink: &mut dyn OutputSink) -> usize {
        let removed = self.registry.clear();
        self.last_emissions.clear();
        sink.clear();
        tracing::info!("Cleared {} tracked entities", removed);
        removed
    }

    /// Apply a control command from outside the tick loop
    pub fn handle_control(
        &mut self,
        message: ControlMessage,
        sink: &mut dyn OutputSink,
    ) -> std::result::Result<(), ConfigError> {
        match message {
            ControlMessage::Reset => {
                self.reset(sink);
            }
            ControlMessage::SetSmoothing { position, rotation } => {
                let mut smoothing = self.smoothing;
                if let Some(position) = position {
                    validate_factor("smoothing.position", position)?;
                    smoothing.position = position;
                }
                if let Some(rotation) = rotation {
                    validate_factor("smoothing.rotation", rotation)?;
                    smoothing.rotation = rotation;
                }
                self.smoothing = smoothing;
                tracing::info!(
                    "Smoothing set to position={} rotation={}",
                    smoothing.position,
                    smoothing.rotation
                );
            }
            ControlMessage::SetDepthScale { depth_scale } => {
                validate_depth_scale(depth_scale)?;
                self.projection.depth_scale = depth_scale;
                tracing::info!("Depth scale set to {}", depth_scale);
            }
            ControlMessage::SetCamera { position, rotation } => {
                let [x, y, z] = position;
                let [qw, qx, qy, qz] = rotation;
                let quaternion = Quaternion::new(qw, qx, qy, qz);
                let finite = position.iter().chain(rotation.iter()).all(|c| c.is_finite());
                if !finite || quaternion.norm() < 1e-9 {
                    return Err(ConfigError::Invalid {
                        field: "camera",
                        reason: "position must be finite and rotation non-zero".to_string(),
                    });
                }
                self.projection.camera =
                    CameraFrame::from_pose(Vector3::new(x, y, z), Quat::from_quaternion(quaternion));
                tracing::info!("Camera moved to ({}, {}, {})", x, y, z);
            }
        }
        Ok(())
    }

    /// Close the socket and drop tracking state; safe to call repeatedly
    pub fn stop(&mut self) {
        if self.receiver.is_open() {
            self.receiver.close();
            let removed = self.registry.clear();
            tracing::info!("Session stopped, {} tracked entities released", removed);
        }
    }

    pub fn is_running(&self) -> bool {
        self.receiver.is_open()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.receiver.local_addr()
    }

    pub fn registry(&self) -> &JointRegistry {
        &self.registry
    }

    pub fn smoothing(&self) -> SmoothingConfig {
        self.smoothing
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn receiver_stats(&self) -> ReceiverStats {
        self.receiver.stats()
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            running: self.is_running(),
            local_addr: Some(self.local_addr().to_string()),
            stats: self.stats,
            receiver: self.receiver_stats(),
            tracked_entities: self.registry.len(),
            tracked_hands: self.registry.hands(),
            smoothing: self.smoothing,
            depth_scale: self.projection.depth_scale,
            last_frame_at: self.last_frame_at,
            last_packet: self
                .last_packet
                .as_ref()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            last_emissions: self.last_emissions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode, Frame, Hand};
    use crate::config::NetworkConfig;
    use crate::sink::MemorySink;
    use crate::tracking::EntityKey;

    fn session() -> Session {
        let config = AppConfig {
            network: NetworkConfig {
                bind_host: "127.0.0.1".to_string(),
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        Session::new(&config).unwrap()
    }

    fn packet(shift: f64) -> Bytes {
        let positions = (0..21).map(|i| (0.3 + shift + i as f64 * 0.02, 0.4 + i as f64 * 0.01, 0.0));
        let frame = Frame::new(vec![Hand::from_positions(0, positions).unwrap()]).unwrap();
        encode(&frame).unwrap()
    }

    #[test]
    fn test_idle_tick() {
        let mut session = session();
        let mut sink = MemorySink::new();
        assert_eq!(session.tick(&mut sink), TickOutcome::Idle);
        assert_eq!(session.stats().ticks, 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_malformed_datagram_keeps_state() {
        let mut session = session();
        let mut sink = MemorySink::new();

        session.process_datagram(packet(0.0), &mut sink);
        let key = EntityKey::landmark(0, 5);
        let before = *session.registry().get(&key).unwrap();

        let outcome = session.process_datagram(Bytes::from_static(b"{not json"), &mut sink);
        assert_eq!(outcome, TickOutcome::Dropped);
        assert_eq!(*session.registry().get(&key).unwrap(), before);
        assert_eq!(session.stats().decode_errors, 1);

        // The next good packet blends from the untouched state
        session.process_datagram(packet(0.0), &mut sink);
        assert_eq!(*session.registry().get(&key).unwrap(), before);
    }

    #[test]
    fn test_reset_and_controls() {
        let mut session = session();
        let mut sink = MemorySink::new();
        session.process_datagram(packet(0.0), &mut sink);
        assert!(!sink.is_empty());

        session.handle_control(ControlMessage::Reset, &mut sink).unwrap();
        assert!(session.registry().is_empty());
        assert!(sink.is_empty());

        session
            .handle_control(ControlMessage::SetSmoothing { position: Some(1.0), rotation: None }, &mut sink)
            .unwrap();
        assert_eq!(session.smoothing().position, 1.0);
        assert_eq!(session.smoothing().rotation, 0.5);

        let rejected = session.handle_control(
            ControlMessage::SetSmoothing { position: Some(0.2), rotation: Some(-1.0) },
            &mut sink,
        );
        assert!(rejected.is_err());
        assert_eq!(session.smoothing().position, 1.0);

        assert!(session
            .handle_control(ControlMessage::SetDepthScale { depth_scale: 0.0 }, &mut sink)
            .is_err());
        session
            .handle_control(ControlMessage::SetDepthScale { depth_scale: 2.0 }, &mut sink)
            .unwrap();
        assert_eq!(session.projection().depth_scale, 2.0);

        assert!(session
            .handle_control(
                ControlMessage::SetCamera { position: [0.0; 3], rotation: [0.0; 4] },
                &mut sink
            )
            .is_err());
        session
            .handle_control(
                ControlMessage::SetCamera { position: [0.0, 0.0, 5.0], rotation: [1.0, 0.0, 0.0, 0.0] },
                &mut sink,
            )
            .unwrap();
        assert_eq!(session.projection().camera.position.z, 5.0);
    }

    #[test]
    fn test_status_snapshot() {
        let mut session = session();
        let mut sink = MemorySink::new();
        session.process_datagram(packet(0.1), &mut sink);

        let status = session.status();
        assert!(status.running);
        assert_eq!(status.stats.frames_decoded, 1);
        assert_eq!(status.tracked_hands, vec![0]);
        assert_eq!(status.last_emissions.len(), 41);
        assert!(status.last_packet.unwrap().starts_with("{\"hands\""));
        assert!(status.last_frame_at.is_some());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut session = session();
        let mut sink = MemorySink::new();
        session.process_datagram(packet(0.0), &mut sink);

        session.stop();
        session.stop();
        assert!(!session.is_running());
        assert!(session.registry().is_empty());
        assert_eq!(session.tick(&mut sink), TickOutcome::Idle);
    }
}
