//! Pointer input normalization
//!
//! Mouse and touch events arrive in client coordinates. The adapter
//! subtracts the surface origin and collapses both families into three
//! actions the canvas understands.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::PointerSample;

/// One touch contact in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// Raw platform pointer event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    MouseDown {
        client_x: f32,
        client_y: f32,
        timestamp_ms: u64,
    },
    MouseMove {
        client_x: f32,
        client_y: f32,
        timestamp_ms: u64,
    },
    MouseUp { timestamp_ms: u64 },
    /// Pointer left the surface; treated as a release
    MouseLeave { timestamp_ms: u64 },
    TouchStart {
        touches: Vec<TouchPoint>,
        timestamp_ms: u64,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
        timestamp_ms: u64,
    },
    TouchEnd { timestamp_ms: u64 },
}

impl PointerEvent {
    pub fn timestamp_ms(&self) -> u64 {
        match *self {
            PointerEvent::MouseDown { timestamp_ms, .. }
            | PointerEvent::MouseMove { timestamp_ms, .. }
            | PointerEvent::MouseUp { timestamp_ms }
            | PointerEvent::MouseLeave { timestamp_ms }
            | PointerEvent::TouchStart { timestamp_ms, .. }
            | PointerEvent::TouchMove { timestamp_ms, .. }
            | PointerEvent::TouchEnd { timestamp_ms } => timestamp_ms,
        }
    }
}

/// Normalized gesture step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    Press(PointerSample),
    Move(PointerSample),
    Release,
}

/// Maps client-space events onto surface-relative samples
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    /// Surface top-left in client coordinates
    origin: Vec2,
}

impl InputAdapter {
    pub fn new(origin: Vec2) -> Self {
        Self { origin }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Translate an event, or None if it carries no usable position
    pub fn normalize(&self, event: &PointerEvent) -> Option<InputAction> {
        match event {
            PointerEvent::MouseDown {
                client_x,
                client_y,
                timestamp_ms,
            } => Some(InputAction::Press(self.sample(
                *client_x,
                *client_y,
                *timestamp_ms,
            ))),
            PointerEvent::MouseMove {
                client_x,
                client_y,
                timestamp_ms,
            } => Some(InputAction::Move(self.sample(
                *client_x,
                *client_y,
                *timestamp_ms,
            ))),
            PointerEvent::TouchStart {
                touches,
                timestamp_ms,
            } => self
                .first_touch(touches, *timestamp_ms)
                .map(InputAction::Press),
            PointerEvent::TouchMove {
                touches,
                timestamp_ms,
            } => self
                .first_touch(touches, *timestamp_ms)
                .map(InputAction::Move),
            PointerEvent::MouseUp { .. }
            | PointerEvent::MouseLeave { .. }
            | PointerEvent::TouchEnd { .. } => Some(InputAction::Release),
        }
    }

    fn first_touch(&self, touches: &[TouchPoint], timestamp_ms: u64) -> Option<PointerSample> {
        touches
            .first()
            .map(|t| self.sample(t.client_x, t.client_y, timestamp_ms))
    }

    fn sample(&self, client_x: f32, client_y: f32, timestamp_ms: u64) -> PointerSample {
        PointerSample::new(
            client_x - self.origin.x,
            client_y - self.origin.y,
            timestamp_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_is_offset_by_origin() {
        let adapter = InputAdapter::new(Vec2::new(100.0, 40.0));
        let event = PointerEvent::MouseDown {
            client_x: 150.0,
            client_y: 90.0,
            timestamp_ms: 7,
        };
        assert_eq!(
            adapter.normalize(&event),
            Some(InputAction::Press(PointerSample::new(50.0, 50.0, 7)))
        );
    }

    #[test]
    fn test_first_touch_wins() {
        let adapter = InputAdapter::default();
        let event = PointerEvent::TouchMove {
            touches: vec![
                TouchPoint {
                    client_x: 3.0,
                    client_y: 4.0,
                },
                TouchPoint {
                    client_x: 90.0,
                    client_y: 90.0,
                },
            ],
            timestamp_ms: 12,
        };
        assert_eq!(
            adapter.normalize(&event),
            Some(InputAction::Move(PointerSample::new(3.0, 4.0, 12)))
        );
    }

    #[test]
    fn test_touch_without_points_is_discarded() {
        let adapter = InputAdapter::default();
        let event = PointerEvent::TouchStart {
            touches: Vec::new(),
            timestamp_ms: 0,
        };
        assert_eq!(adapter.normalize(&event), None);
    }

    #[test]
    fn test_leave_and_end_release() {
        let adapter = InputAdapter::default();
        for event in [
            PointerEvent::MouseUp { timestamp_ms: 1 },
            PointerEvent::MouseLeave { timestamp_ms: 2 },
            PointerEvent::TouchEnd { timestamp_ms: 3 },
        ] {
            assert_eq!(adapter.normalize(&event), Some(InputAction::Release));
        }
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{"type":"mouse_move","client_x":1.5,"client_y":2.0,"timestamp_ms":33}"#;
        let event: PointerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.timestamp_ms(), 33);
        assert!(matches!(event, PointerEvent::MouseMove { client_x, .. } if client_x == 1.5));

        let touch = r#"{"type":"touch_start","touches":[{"client_x":1,"client_y":2}],"timestamp_ms":0}"#;
        assert!(serde_json::from_str::<PointerEvent>(touch).is_ok());
    }
}
