//! HTTP API handlers

use axum::{extract::State, http::StatusCode, Json};
use crossbeam_channel::TrySendError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{validate_depth_scale, validate_factor};
use crate::protocol::{ControlMessage, StatusSnapshot};
use crate::skeleton::{BoneSegment, BONES, LANDMARK_NAMES};
use crate::tracking::Emission;
use crate::ui::server::AppState;

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

/// Last decoded packet and what it produced
#[derive(Debug, Serialize)]
pub struct FrameView {
    /// Raw datagram parsed back to JSON, or the text if that fails
    pub packet: Option<serde_json::Value>,
    pub emissions: Vec<Emission>,
}

/// Landmark and bone names
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub landmarks: Vec<&'static str>,
    pub bones: Vec<BoneSegment>,
}

#[derive(Debug, Deserialize)]
pub struct SmoothingRequest {
    #[serde(default)]
    pub position: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DepthRequest {
    pub depth_scale: f64,
}

/// Get session status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatusSnapshot>> {
    Json(ApiResponse::ok(state.status.read().clone()))
}

/// Get the last packet and emissions
pub async fn get_frame(State(state): State<Arc<AppState>>) -> Json<ApiResponse<FrameView>> {
    let status = state.status.read();
    let packet = status.last_packet.as_ref().map(|text| {
        serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.clone()))
    });
    Json(ApiResponse::ok(FrameView {
        packet,
        emissions: status.last_emissions.clone(),
    }))
}

/// Get landmark and bone names
pub async fn get_landmarks() -> Json<ApiResponse<Catalog>> {
    Json(ApiResponse::ok(Catalog {
        landmarks: LANDMARK_NAMES.to_vec(),
        bones: BONES.to_vec(),
    }))
}

/// Clear all tracking state
pub async fn reset(State(state): State<Arc<AppState>>) -> Reply<()> {
    send_control(&state, ControlMessage::Reset)
}

/// Change smoothing factors
pub async fn set_smoothing(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SmoothingRequest>,
) -> Reply<()> {
    let checked = req
        .position
        .map_or(Ok(()), |v| validate_factor("position", v))
        .and_then(|_| req.rotation.map_or(Ok(()), |v| validate_factor("rotation", v)));
    if let Err(e) = checked {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
    }

    send_control(
        &state,
        ControlMessage::SetSmoothing {
            position: req.position,
            rotation: req.rotation,
        },
    )
}

/// Change the depth scale
pub async fn set_depth(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DepthRequest>,
) -> Reply<()> {
    if let Err(e) = validate_depth_scale(req.depth_scale) {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
    }
    send_control(&state, ControlMessage::SetDepthScale { depth_scale: req.depth_scale })
}

fn send_control(state: &AppState, message: ControlMessage) -> Reply<()> {
    match state.control_tx.try_send(message) {
        Ok(()) => (StatusCode::ACCEPTED, Json(ApiResponse::ok(()))),
        Err(TrySendError::Full(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error("control queue full")),
        ),
        Err(TrySendError::Disconnected(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error("session stopped")),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SharedStatus;
    use crossbeam_channel::{bounded, Receiver};

    fn state(capacity: usize) -> (Arc<AppState>, Receiver<ControlMessage>) {
        let (control_tx, control_rx) = bounded(capacity);
        let status: SharedStatus = Default::default();
        (Arc::new(AppState { status, control_tx }), control_rx)
    }

    #[tokio::test]
    async fn test_smoothing_forwards_valid_request() {
        let (state, rx) = state(4);
        let (code, _) = set_smoothing(
            State(state),
            Json(SmoothingRequest { position: Some(0.3), rotation: None }),
        )
        .await;

        assert_eq!(code, StatusCode::ACCEPTED);
        assert_eq!(
            rx.try_recv().unwrap(),
            ControlMessage::SetSmoothing { position: Some(0.3), rotation: None }
        );
    }

    #[tokio::test]
    async fn test_invalid_requests_not_forwarded() {
        let (state, rx) = state(4);
        let (code, Json(body)) = set_smoothing(
            State(state.clone()),
            Json(SmoothingRequest { position: None, rotation: Some(2.0) }),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(!body.success);

        let (code, _) = set_depth(State(state), Json(DepthRequest { depth_scale: -1.0 })).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue() {
        let (state, _rx) = state(1);
        assert_eq!(reset(State(state.clone())).await.0, StatusCode::ACCEPTED);
        assert_eq!(reset(State(state)).await.0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_frame_view() {
        let (state, _rx) = state(1);
        state.status.write().last_packet = Some(r#"{"hands":[]}"#.to_string());

        let Json(body) = get_frame(State(state)).await;
        let frame = body.data.unwrap();
        assert_eq!(frame.packet, Some(serde_json::json!({"hands": []})));
        assert!(frame.emissions.is_empty());
    }

    #[tokio::test]
    async fn test_catalog() {
        let Json(body) = get_landmarks().await;
        let catalog = body.data.unwrap();
        assert_eq!(catalog.landmarks.len(), 21);
        assert_eq!(catalog.bones.len(), 20);
    }
}
