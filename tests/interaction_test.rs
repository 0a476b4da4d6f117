mod common;

use battlemap::prelude::*;
use common::*;

/// Integration tests for token dragging and the movement protocol
#[cfg(test)]
mod interaction_tests {
    use super::*;

    fn moved(message: ProtocolMessage) -> TokenMoved {
        let ProtocolMessage::TokenMoved(moved) = message;
        moved
    }

    fn remote_move(id: &str, x: f64, y: f64, state: ControlState) -> ProtocolMessage {
        TokenMoved::new(id, Point::new(x, y), state).into()
    }

    #[test]
    fn test_drag_emits_start_control_end() {
        let mut map = container();
        let (outbox, rx) = Outbox::channel();
        map.connect(outbox);
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.pointer(PointerEvent::Down {
            position: Point::new(40.0, 30.0),
        });
        map.pointer(PointerEvent::Move {
            position: Point::new(80.0, 30.0),
        });
        map.pointer(PointerEvent::Move {
            position: Point::new(120.5, 33.7),
        });
        map.pointer(PointerEvent::Up {
            position: Point::new(120.5, 33.7),
        });

        let sent: Vec<TokenMoved> = rx.try_iter().map(moved).collect();
        let states: Vec<_> = sent.iter().map(|m| m.state).collect();
        assert_eq!(
            states,
            vec![
                ControlState::Start,
                ControlState::Control,
                ControlState::Control,
                ControlState::End,
            ]
        );
        assert_eq!((sent[0].x, sent[0].y), (35, 35));
        assert_eq!((sent[2].x, sent[2].y), (120, 33));
        assert_eq!((sent[3].x, sent[3].y), (120, 33));
        assert!(sent.iter().all(|m| m.id == "hero"));
        assert_eq!(map.active_drag(), None);
    }

    #[test]
    fn test_hostile_token_cannot_be_dragged() {
        let mut map = container();
        let (outbox, rx) = Outbox::channel();
        map.connect(outbox);
        map.update(&snapshot(vec![hostile("orc", 35.0, 35.0)])).unwrap();

        assert!(map.pointer_down(Point::new(35.0, 35.0)).is_none());
        assert!(map.pointer_move(Point::new(105.0, 35.0)).is_none());
        assert!(rx.is_empty());
    }

    #[test]
    fn test_remotely_controlled_token_ignores_pointer() {
        let mut map = container();
        let (outbox, rx) = Outbox::channel();
        map.connect(outbox);
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.apply_remote(&remote_move("hero", 35.0, 35.0, ControlState::Start));
        assert!(map.token_by_id("hero").unwrap().is_controlled());

        map.pointer_down(Point::new(35.0, 35.0));
        map.pointer_move(Point::new(105.0, 35.0));
        map.pointer_up(Point::new(105.0, 35.0));
        assert!(rx.is_empty());
        assert_eq!(map.token_by_id("hero").unwrap().center(), Point::new(35.0, 35.0));
    }

    #[test]
    fn test_remote_drag_moves_token() {
        let mut map = container();
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.apply_remote(&remote_move("hero", 35.0, 35.0, ControlState::Start));
        map.apply_remote(&remote_move("hero", 140.0, 70.0, ControlState::Control));
        let view = map.token_by_id("hero").unwrap();
        assert_eq!(view.center(), Point::new(140.0, 70.0));
        assert_eq!(view.aura_anchor(), Point::new(140.0, 70.0));

        map.apply_remote(&remote_move("hero", 140.0, 70.0, ControlState::End));
        assert!(!map.token_by_id("hero").unwrap().is_controlled());
    }

    #[test]
    fn test_blocked_move_holds_position() {
        let mut map = container();
        let (outbox, rx) = Outbox::channel();
        map.connect(outbox);
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_move(Point::new(105.0, 35.0)).unwrap();
        map.apply_remote(&remote_move("hero", 105.0, 35.0, ControlState::Blocked));
        assert!(map.token_by_id("hero").unwrap().is_blocked());

        let control = moved(map.pointer_move(Point::new(175.0, 35.0)).unwrap());
        assert_eq!(control.state, ControlState::Control);
        assert_eq!(map.token_by_id("hero").unwrap().center(), Point::new(105.0, 35.0));

        map.pointer_up(Point::new(105.0, 35.0)).unwrap();
        assert!(!map.token_by_id("hero").unwrap().is_blocked());
        assert_eq!(rx.len(), 4);
    }

    #[test]
    fn test_late_block_does_not_freeze_next_drag() {
        let mut map = container();
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_up(Point::new(35.0, 35.0)).unwrap();
        map.apply_remote(&remote_move("hero", 35.0, 35.0, ControlState::Blocked));
        assert!(!map.token_by_id("hero").unwrap().is_blocked());

        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_move(Point::new(300.0, 300.0)).unwrap();
        assert_eq!(map.token_by_id("hero").unwrap().center(), Point::new(300.0, 300.0));
    }

    #[test]
    fn test_remote_cancel_aborts_local_drag() {
        let mut map = container();
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_move(Point::new(315.0, 35.0)).unwrap();
        map.apply_remote(&remote_move("hero", 0.0, 0.0, ControlState::Cancel));

        let view = map.token_by_id("hero").unwrap();
        assert!(!view.is_dragging());
        assert_eq!(view.center(), Point::new(35.0, 35.0));
        assert_eq!(map.active_drag(), None);
        assert!(map.pointer_move(Point::new(400.0, 35.0)).is_none());
    }

    #[test]
    fn test_echoed_messages_do_not_disturb_local_drag() {
        let mut map = container();
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_move(Point::new(105.0, 35.0)).unwrap();
        map.apply_remote(&remote_move("hero", 35.0, 35.0, ControlState::Start));
        map.apply_remote(&remote_move("hero", 500.0, 500.0, ControlState::Control));

        let view = map.token_by_id("hero").unwrap();
        assert!(view.is_dragging());
        assert!(!view.is_controlled());
        assert_eq!(view.center(), Point::new(105.0, 35.0));
    }

    #[test]
    fn test_snapshot_does_not_override_drag() {
        let mut map = container();
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();

        map.pointer_down(Point::new(35.0, 35.0)).unwrap();
        map.pointer_move(Point::new(105.0, 35.0)).unwrap();
        map.update(&snapshot(vec![friendly("hero", 385.0, 385.0)])).unwrap();
        assert_eq!(map.token_by_id("hero").unwrap().center(), Point::new(105.0, 35.0));

        map.pointer_up(Point::new(105.0, 35.0)).unwrap();
        map.update(&snapshot(vec![friendly("hero", 175.0, 35.0)])).unwrap();
        assert_eq!(map.token_by_id("hero").unwrap().center(), Point::new(175.0, 35.0));
    }

    #[test]
    fn test_removed_token_ends_local_drag() {
        let mut map = container();
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();
        map.pointer_down(Point::new(35.0, 35.0)).unwrap();

        map.update(&snapshot(vec![])).unwrap();
        assert_eq!(map.active_drag(), None);
        assert!(map.pointer_move(Point::new(105.0, 35.0)).is_none());
    }

    #[test]
    fn test_message_wire_round_trip() {
        let json = r#"{"name":"token-moved","data":{"id":"hero","x":140,"y":70,"state":"control"}}"#;
        let message = ProtocolMessage::from_json(json).unwrap();
        assert_eq!(message, remote_move("hero", 140.0, 70.0, ControlState::Control));

        let mut map = container();
        map.update(&snapshot(vec![friendly("hero", 35.0, 35.0)])).unwrap();
        map.apply_remote(&message);
        assert_eq!(map.token_by_id("hero").unwrap().center(), Point::new(140.0, 70.0));
    }
}
