pub mod input;
pub mod model;
pub mod view;

pub use input::{FocusRequest, InputEvent, InputOutcome, Key};
pub use model::{Knob, KnobEvent, ListenerId, normalize_rotation, tick_directions};
pub use view::{Fill, KnobPalette, Stroke, Surface, render};

/// Rotation step, in degrees, for one scroll unit or key press without snapping.
pub const FREE_STEP: f64 = 1.0;
pub const DISABLED_OPACITY: f64 = 0.4;
pub const FOCUSED_OUTLINE_WIDTH: f64 = 2.0;
pub const OUTLINE_WIDTH: f64 = 1.0;
pub const TICK_WIDTH: f64 = 1.0;
