pub mod geometry;
pub mod knob;
pub mod macros;
pub mod options;
pub mod vector;

pub use geometry::DialGeometry;
pub use knob::{
    render, Fill, FocusRequest, InputEvent, InputOutcome, Key, Knob, KnobEvent, KnobPalette,
    ListenerId, Stroke, Surface,
};
pub use options::{BoundaryMode, FontFamily, KnobOptions, LabelFont, OptionsError, RangePolicy};
pub use vector::Point;
