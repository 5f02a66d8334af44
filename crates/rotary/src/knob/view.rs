use super::model::Knob;
use super::{DISABLED_OPACITY, FOCUSED_OUTLINE_WIDTH, OUTLINE_WIDTH, TICK_WIDTH};
use crate::options::LabelFont;
use crate::vector::Point;
use palette::{Srgb, Srgba, WithAlpha};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Srgba<f64>),
    /// `inner` at the center fading to `outer` at the rim.
    Radial {
        inner: Srgba<f64>,
        outer: Srgba<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Srgba<f64>,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Srgba<f64>, width: f64) -> Self {
        Self { color, width }
    }
}

/// Drawing primitives a host toolkit provides for the knob to paint onto.
pub trait Surface {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) -> Result<(), Self::Error>;
    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        stroke: &Stroke,
    ) -> Result<(), Self::Error>;
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), Self::Error>;
    fn draw_text_centered(
        &mut self,
        anchor: Point,
        text: &str,
        font: &LabelFont,
        color: Srgba<f64>,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobPalette {
    pub body_inner: Srgba<f64>,
    pub body_outer: Srgba<f64>,
    pub outline: Srgba<f64>,
    pub accent: Srgba<f64>,
    pub tick: Srgba<f64>,
    pub indicator: Srgba<f64>,
    pub label: Srgba<f64>,
}

impl Default for KnobPalette {
    fn default() -> Self {
        Self {
            body_inner: gray(237),
            body_outer: gray(207),
            outline: gray(208),
            accent: rgb(0x03, 0x9E, 0xD3),
            tick: gray(153),
            indicator: gray(102),
            label: gray(51),
        }
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Srgba<f64> {
    Srgb::new(r, g, b).into_format::<f64>().with_alpha(1.0)
}

fn gray(level: u8) -> Srgba<f64> {
    rgb(level, level, level)
}

fn faded(color: Srgba<f64>, opacity: f64) -> Srgba<f64> {
    let mut color = color;
    color.alpha *= opacity;
    color
}

pub fn render<S: Surface>(
    knob: &Knob,
    palette: &KnobPalette,
    surface: &mut S,
) -> Result<(), S::Error> {
    let opacity = if knob.is_enabled() {
        1.0
    } else {
        DISABLED_OPACITY
    };
    let geometry = knob.geometry();

    surface.clear()?;

    surface.fill_circle(
        geometry.center,
        geometry.radius,
        &Fill::Radial {
            inner: faded(palette.body_inner, opacity),
            outer: faded(palette.body_outer, opacity),
        },
    )?;

    let outline = if knob.is_focused() && knob.is_enabled() {
        Stroke::new(faded(palette.accent, opacity), FOCUSED_OUTLINE_WIDTH)
    } else {
        Stroke::new(faded(palette.outline, opacity), OUTLINE_WIDTH)
    };
    surface.stroke_circle(geometry.center, geometry.radius, &outline)?;

    if knob.shows_tick_marks() {
        let stroke = Stroke::new(faded(palette.tick, opacity), TICK_WIDTH);
        for mark in knob.tick_marks() {
            let (from, to) = geometry.tick_segment(*mark);
            surface.stroke_line(from, to, &stroke)?;
        }
    }

    surface.fill_circle(
        geometry.indicator_center(knob.direction()),
        geometry.indicator_radius,
        &Fill::Solid(faded(palette.indicator, opacity)),
    )?;

    if knob.shows_value_label() {
        surface.draw_text_centered(
            geometry.center,
            knob.label(),
            knob.label_font(),
            faded(palette.label, opacity),
        )?;
    }

    Ok(())
}
