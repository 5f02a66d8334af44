use crate::knob::model::Knob;
use crate::vector::Point;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    Up,
    Down,
}

/// Raw input delivered by the host toolkit. Pointer positions are in widget
/// coordinates, the same space as [`crate::DialGeometry::center`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerPressed(Point),
    PointerDragged(Point),
    PointerReleased(Point),
    /// Deltas are in scroll units; positive rotates clockwise. `horizontal`
    /// selects `delta_x` (shift held) over `delta_y`.
    Scroll {
        delta_x: f64,
        delta_y: f64,
        horizontal: bool,
    },
    KeyPressed(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    Grab,
    Release,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub should_redraw: bool,
    pub focus: Option<FocusRequest>,
}

impl InputOutcome {
    pub fn new(should_redraw: bool, focus: Option<FocusRequest>) -> Self {
        Self {
            should_redraw,
            focus,
        }
    }

    fn redraw(should_redraw: bool) -> Self {
        Self::new(should_redraw, None)
    }

    fn focus(request: FocusRequest) -> Self {
        Self::new(false, Some(request))
    }
}

impl Knob {
    /// Feeds one input event through the knob. Focus is only requested here;
    /// the host applies it and reports back through [`Knob::set_focused`].
    pub fn handle(&mut self, event: InputEvent) -> InputOutcome {
        if !self.is_enabled() {
            return InputOutcome::default();
        }

        match event {
            InputEvent::PointerPressed(point) => {
                if !self.is_focused() && self.geometry().contains(point) {
                    InputOutcome::focus(FocusRequest::Grab)
                } else {
                    InputOutcome::default()
                }
            }
            InputEvent::PointerDragged(point) => self.rotate_towards(point),
            InputEvent::PointerReleased(point) => {
                if self.release_outside_blurs()
                    && self.is_focused()
                    && !self.geometry().contains(point)
                {
                    InputOutcome::focus(FocusRequest::Release)
                } else {
                    InputOutcome::default()
                }
            }
            InputEvent::Scroll {
                delta_x,
                delta_y,
                horizontal,
            } => {
                let delta = if horizontal { delta_x } else { delta_y };
                if delta == 0.0 {
                    return InputOutcome::default();
                }
                self.nudge(delta)
            }
            InputEvent::KeyPressed(Key::Up) => self.nudge(-1.0),
            InputEvent::KeyPressed(Key::Down) => self.nudge(1.0),
        }
    }

    fn rotate_towards(&mut self, point: Point) -> InputOutcome {
        match self.geometry().angle_at(point) {
            Some(angle) => InputOutcome::redraw(self.apply_value(angle)),
            // exactly on the center: no direction, keep the current value
            None => InputOutcome::default(),
        }
    }

    fn nudge(&mut self, steps: f64) -> InputOutcome {
        let target = self.value() + steps * self.step();
        InputOutcome::redraw(self.apply_value(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RangePolicy;

    fn knob() -> Knob {
        let mut knob = Knob::new(100.0);
        knob.set_tick_spacing(30.0);
        knob
    }

    #[test]
    fn test_drag_sets_angle() {
        let mut knob = knob();
        let center = knob.geometry().center;

        let cases = vec![
            (Point::new(center.x + 20.0, center.y), 90.0),
            (Point::new(center.x, center.y + 20.0), 180.0),
            (Point::new(center.x - 20.0, center.y), 270.0),
            (Point::new(center.x + 20.0, center.y - 20.0), 45.0),
        ];

        for (point, expected) in cases {
            let outcome = knob.handle(InputEvent::PointerDragged(point));
            assert!(outcome.should_redraw);
            assert!((knob.value() - expected).abs() < 1e-9, "{}", knob.value());
        }
    }

    #[test]
    fn test_drag_outside_dial_still_rotates() {
        let mut knob = knob();
        knob.handle(InputEvent::PointerDragged(Point::new(500.0, 52.0)));
        assert!((knob.value() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_with_snap() {
        let mut knob = knob();
        knob.set_snap_to_ticks(true);
        let center = knob.geometry().center;
        // 100 degrees clockwise from up
        let dir = crate::vector::direction(100.0);
        knob.handle(InputEvent::PointerDragged(center.project(dir, 30.0)));
        assert_eq!(knob.value(), 90.0);
    }

    #[test]
    fn test_drag_on_center_is_noop() {
        let mut knob = knob();
        knob.set_value(42.0);
        let center = knob.geometry().center;
        let outcome = knob.handle(InputEvent::PointerDragged(center));
        assert_eq!(outcome, InputOutcome::default());
        assert_eq!(knob.value(), 42.0);
    }

    #[test]
    fn test_keys_step() {
        let mut knob = knob();
        knob.set_value(10.0);
        knob.handle(InputEvent::KeyPressed(Key::Down));
        assert_eq!(knob.value(), 11.0);
        knob.handle(InputEvent::KeyPressed(Key::Up));
        knob.handle(InputEvent::KeyPressed(Key::Up));
        assert_eq!(knob.value(), 9.0);

        knob.set_snap_to_ticks(true);
        assert_eq!(knob.value(), 0.0);
        knob.handle(InputEvent::KeyPressed(Key::Up));
        assert_eq!(knob.value(), 330.0);
        knob.handle(InputEvent::KeyPressed(Key::Down));
        knob.handle(InputEvent::KeyPressed(Key::Down));
        assert_eq!(knob.value(), 30.0);
    }

    #[test]
    fn test_scroll() {
        let mut knob = knob();
        knob.handle(InputEvent::Scroll {
            delta_x: 0.0,
            delta_y: 3.0,
            horizontal: false,
        });
        assert_eq!(knob.value(), 3.0);

        knob.handle(InputEvent::Scroll {
            delta_x: -5.0,
            delta_y: 3.0,
            horizontal: true,
        });
        assert_eq!(knob.value(), 358.0);

        knob.set_snap_to_ticks(true);
        knob.handle(InputEvent::Scroll {
            delta_x: 0.0,
            delta_y: 2.0,
            horizontal: false,
        });
        assert_eq!(knob.value(), 60.0);
    }

    #[test]
    fn test_zero_scroll_is_noop() {
        let mut knob = knob();
        let outcome = knob.handle(InputEvent::Scroll {
            delta_x: 4.0,
            delta_y: 0.0,
            horizontal: false,
        });
        assert_eq!(outcome, InputOutcome::default());
        assert_eq!(knob.value(), 0.0);
    }

    #[test]
    fn test_scroll_clamped() {
        let mut knob = knob();
        knob.set_range_policy(RangePolicy::Clamp {
            min: 0.0,
            max: 90.0,
        });
        knob.handle(InputEvent::Scroll {
            delta_x: 0.0,
            delta_y: -4.0,
            horizontal: false,
        });
        assert_eq!(knob.value(), 0.0);
        knob.handle(InputEvent::Scroll {
            delta_x: 0.0,
            delta_y: 400.0,
            horizontal: false,
        });
        assert_eq!(knob.value(), 90.0);
    }

    #[test]
    fn test_press_requests_focus_inside_dial() {
        let mut knob = knob();
        let center = knob.geometry().center;

        let outcome = knob.handle(InputEvent::PointerPressed(Point::new(center.x, 3.0)));
        assert_eq!(outcome.focus, Some(FocusRequest::Grab));

        let outcome = knob.handle(InputEvent::PointerPressed(Point::new(0.0, 0.0)));
        assert_eq!(outcome.focus, None);

        knob.set_focused(true);
        let outcome = knob.handle(InputEvent::PointerPressed(center));
        assert_eq!(outcome.focus, None);
    }

    #[test]
    fn test_release_outside_blurs() {
        let mut knob = knob();
        knob.set_focused(true);
        let outside = InputEvent::PointerReleased(Point::new(0.0, 0.0));

        assert_eq!(knob.handle(outside).focus, None);

        knob.set_release_outside_blurs(true);
        assert_eq!(knob.handle(outside).focus, Some(FocusRequest::Release));

        let center = knob.geometry().center;
        assert_eq!(
            knob.handle(InputEvent::PointerReleased(center)).focus,
            None
        );
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut knob = knob();
        knob.set_enabled(false);
        let center = knob.geometry().center;

        let events = [
            InputEvent::PointerPressed(center),
            InputEvent::PointerDragged(Point::new(center.x + 10.0, center.y)),
            InputEvent::KeyPressed(Key::Down),
            InputEvent::Scroll {
                delta_x: 0.0,
                delta_y: 1.0,
                horizontal: false,
            },
        ];
        for event in events {
            assert_eq!(knob.handle(event), InputOutcome::default());
        }
        assert_eq!(knob.value(), 0.0);
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!("up".parse::<Key>(), Ok(Key::Up));
        assert_eq!("Down".parse::<Key>(), Ok(Key::Down));
        assert!("left".parse::<Key>().is_err());
    }
}
