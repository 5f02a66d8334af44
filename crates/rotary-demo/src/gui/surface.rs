use cairo::Context;
use palette::Srgba;
use rotary::{Fill, LabelFont, Point, Stroke, Surface};
use std::f64::consts::PI;

/// Paints the knob onto a `DrawingArea`'s cairo context.
pub struct CairoSurface<'a> {
    cr: &'a Context,
}

impl<'a> CairoSurface<'a> {
    pub fn new(cr: &'a Context) -> Self {
        Self { cr }
    }

    fn set_color(&self, color: Srgba<f64>) {
        let (r, g, b, a) = color.into_components();
        self.cr.set_source_rgba(r, g, b, a);
    }

    fn circle_path(&self, center: Point, radius: f64) {
        self.cr.new_path();
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
    }
}

impl Surface for CairoSurface<'_> {
    type Error = cairo::Error;

    fn clear(&mut self) -> Result<(), cairo::Error> {
        self.cr.save()?;
        self.cr.set_operator(cairo::Operator::Clear);
        self.cr.paint()?;
        self.cr.restore()
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: &Fill) -> Result<(), cairo::Error> {
        self.circle_path(center, radius);
        match *fill {
            Fill::Solid(color) => self.set_color(color),
            Fill::Radial { inner, outer } => {
                let gradient =
                    cairo::RadialGradient::new(center.x, center.y, 0.0, center.x, center.y, radius);
                for (offset, color) in [(0.0, inner), (1.0, outer)] {
                    let (r, g, b, a) = color.into_components();
                    gradient.add_color_stop_rgba(offset, r, g, b, a);
                }
                self.cr.set_source(&gradient)?;
            }
        }
        self.cr.fill()
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        stroke: &Stroke,
    ) -> Result<(), cairo::Error> {
        self.circle_path(center, radius);
        self.set_color(stroke.color);
        self.cr.set_line_width(stroke.width);
        self.cr.stroke()
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), cairo::Error> {
        self.cr.new_path();
        self.cr.move_to(from.x, from.y);
        self.cr.line_to(to.x, to.y);
        self.set_color(stroke.color);
        self.cr.set_line_width(stroke.width);
        self.cr.stroke()
    }

    fn draw_text_centered(
        &mut self,
        anchor: Point,
        text: &str,
        font: &LabelFont,
        color: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        self.set_color(color);
        self.cr.select_font_face(
            font.family.as_str(),
            cairo::FontSlant::Normal,
            cairo::FontWeight::Normal,
        );
        self.cr.set_font_size(font.size);
        let ext = self.cr.text_extents(text)?;
        self.cr.move_to(
            anchor.x - ext.width() / 2.0 - ext.x_bearing(),
            anchor.y - ext.height() / 2.0 - ext.y_bearing(),
        );
        self.cr.show_text(text)
    }
}
