use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Pointer events that can be handled by a token view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Button pressed over the map
    Down { position: Point },
    /// Pointer moved
    Move { position: Point },
    /// Button released over the view that received the press
    Up { position: Point },
    /// Button released somewhere else
    UpOutside { position: Point },
}

impl PointerEvent {
    /// Gets the position associated with this event
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::UpOutside { position } => *position,
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, PointerEvent::Up { .. } | PointerEvent::UpOutside { .. })
    }
}

/// Global gate on which tokens accept pointer focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    #[default]
    All,
    TurnOnly,
    None,
}

/// Everything a token view needs to decide whether it is interactive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionContext {
    pub mode: InteractionMode,
    /// Token currently holding the turn
    pub turn_holder: Option<String>,
    /// Before the encounter starts every friendly token may move
    pub started: bool,
}

impl InteractionContext {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            turn_holder: None,
            started: false,
        }
    }

    pub fn holds_turn(&self, id: &str) -> bool {
        self.turn_holder.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_event_position() {
        let down = PointerEvent::Down {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(down.position(), Point::new(100.0, 200.0));
        assert!(!down.is_release());

        let up = PointerEvent::UpOutside {
            position: Point::new(5.0, 5.0),
        };
        assert!(up.is_release());
    }

    #[test]
    fn test_interaction_mode_wire_names() {
        assert_eq!(serde_json::to_string(&InteractionMode::TurnOnly).unwrap(), "\"turn-only\"");
        let mode: InteractionMode = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(mode, InteractionMode::None);
    }

    #[test]
    fn test_holds_turn() {
        let mut context = InteractionContext::new(InteractionMode::TurnOnly);
        assert!(!context.holds_turn("a"));
        context.turn_holder = Some("a".to_string());
        assert!(context.holds_turn("a"));
        assert!(!context.holds_turn("b"));
    }
}
