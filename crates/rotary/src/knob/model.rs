use crate::geometry::DialGeometry;
use crate::knob::FREE_STEP;
use crate::options::{self, FULL_TURN, KnobOptions, LabelFont, OptionsError, RangePolicy};
use crate::vector;
use derive_more::{Display, From, Into};

/// Brings `value` into the domain described by `range`, snapping to multiples of
/// `snap` when given.
///
/// Under [`RangePolicy::Wrap`] the half-tick band on either side of 0° collapses
/// to exactly 0 so the lowest and highest tick never both claim the zero point.
pub fn normalize_rotation(value: f64, range: RangePolicy, snap: Option<f64>) -> f64 {
    match range {
        RangePolicy::Wrap => {
            let wrapped = wrap(value);
            match snap {
                Some(spacing) => {
                    let half = spacing * 0.5;
                    let in_dead_zone = |v: f64| v < half || v > FULL_TURN - half;
                    if in_dead_zone(wrapped) {
                        return 0.0;
                    }
                    // a tick can itself sit in the dead zone when spacing does not divide 360
                    let snapped = spacing * (wrapped / spacing).round();
                    if in_dead_zone(snapped) { 0.0 } else { wrap(snapped) }
                }
                None => wrapped,
            }
        }
        RangePolicy::Clamp { min, max } => match snap {
            Some(spacing) => snap_within(value, spacing, min, max),
            None => value.max(min).min(max),
        },
    }
}

/// Nearest tick inside `[min, max]`. Falls back to the bound itself when no tick
/// lies inside the range.
fn snap_within(value: f64, spacing: f64, min: f64, max: f64) -> f64 {
    let snapped = spacing * (value / spacing).round();
    if snapped < min {
        let up = spacing * (min / spacing).ceil();
        if up <= max { up.max(min) } else { min }
    } else if snapped > max {
        let down = spacing * (max / spacing).floor();
        if down >= min { down.min(max) } else { max }
    } else {
        snapped
    }
}

fn wrap(value: f64) -> f64 {
    let wrapped = value.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Unit vectors at `0, spacing, 2 * spacing, ...` below one full turn.
pub fn tick_directions(spacing: f64) -> Vec<[f64; 2]> {
    let count = (FULL_TURN / spacing - 1e-9).ceil().max(1.0) as usize;
    (0..count)
        .map(|i| vector::direction(i as f64 * spacing))
        .collect()
}

pub fn format_label(value: f64) -> String {
    format!("{value:.1}\u{00B0}")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnobEvent {
    ValueChanged { previous: f64, current: f64 },
    FocusChanged(bool),
    RedrawRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&KnobEvent)>;

/// Rotary knob state. Owns the rotation value, display options and the tick
/// cache, and tells subscribers whenever something observable changes.
///
/// Listeners run synchronously inside the mutating call, after normalization.
pub struct Knob {
    geometry: DialGeometry,
    value: f64,
    direction: [f64; 2],
    label: String,
    tick_spacing: f64,
    tick_marks: Vec<[f64; 2]>,
    snap_to_ticks: bool,
    show_tick_marks: bool,
    show_value_label: bool,
    label_font: LabelFont,
    range: RangePolicy,
    release_outside_blurs: bool,
    enabled: bool,
    focused: bool,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Knob {
    pub fn new(diameter: f64) -> Self {
        let tick_spacing = options::DEFAULT_TICK_SPACING;
        Self {
            geometry: DialGeometry::new(diameter),
            value: 0.0,
            direction: vector::direction(0.0),
            label: format_label(0.0),
            tick_spacing,
            tick_marks: tick_directions(tick_spacing),
            snap_to_ticks: false,
            show_tick_marks: false,
            show_value_label: false,
            label_font: LabelFont::default(),
            range: RangePolicy::Wrap,
            release_outside_blurs: false,
            enabled: true,
            focused: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn from_options(opts: &KnobOptions) -> Result<Self, OptionsError> {
        let mut knob = Self::new(opts.diameter);
        knob.apply_options(opts)?;
        knob.apply_value(opts.initial_value);
        Ok(knob)
    }

    /// Applies everything in `opts` except the diameter, which is fixed for
    /// the lifetime of a knob, and the initial value. The current value is
    /// re-normalized under the new rules. Nothing changes when `opts` is invalid.
    pub fn apply_options(&mut self, opts: &KnobOptions) -> Result<(), OptionsError> {
        opts.validate()?;
        let range = opts.range_policy()?;

        if DialGeometry::new(opts.diameter) != self.geometry {
            log::debug!(
                "Ignoring diameter {} for an existing knob of radius {}",
                opts.diameter,
                self.geometry.radius
            );
        }

        if self.tick_spacing != opts.tick_spacing {
            self.tick_spacing = opts.tick_spacing;
            self.tick_marks = tick_directions(opts.tick_spacing);
        }
        self.snap_to_ticks = opts.snap_to_ticks;
        self.show_tick_marks = opts.show_tick_marks;
        self.show_value_label = opts.show_value_label;
        self.label_font = opts.label_font();
        self.range = range;
        self.release_outside_blurs = opts.release_outside_blurs;

        self.renormalize();
        self.request_redraw();
        Ok(())
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Out-of-domain values are wrapped or clamped; non-finite ones are ignored.
    pub fn set_value(&mut self, degrees: f64) {
        self.apply_value(degrees);
    }

    /// Normalizes and stores `raw`. Returns whether the stored value changed.
    pub(crate) fn apply_value(&mut self, raw: f64) -> bool {
        if !raw.is_finite() {
            log::warn!("Ignoring non-finite knob value {}", raw);
            return false;
        }

        let current = normalize_rotation(raw, self.range, self.snap_step());
        let previous = self.value;
        if current == previous {
            return false;
        }

        self.value = current;
        self.direction = vector::direction(current);
        self.label = format_label(current);
        self.emit(KnobEvent::ValueChanged { previous, current });
        self.request_redraw();
        true
    }

    fn renormalize(&mut self) {
        self.apply_value(self.value);
    }

    fn snap_step(&self) -> Option<f64> {
        self.snap_to_ticks.then_some(self.tick_spacing)
    }

    /// Degrees moved by one scroll unit or key press.
    pub fn step(&self) -> f64 {
        self.snap_step().unwrap_or(FREE_STEP)
    }

    pub fn tick_spacing(&self) -> f64 {
        self.tick_spacing
    }

    pub fn set_tick_spacing(&mut self, spacing: f64) {
        let spacing = match options::check_tick_spacing(spacing) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };
        if spacing == self.tick_spacing {
            return;
        }

        self.tick_spacing = spacing;
        self.tick_marks = tick_directions(spacing);
        self.renormalize();
        self.request_redraw();
    }

    pub fn tick_marks(&self) -> &[[f64; 2]] {
        &self.tick_marks
    }

    pub fn is_snap_to_ticks(&self) -> bool {
        self.snap_to_ticks
    }

    pub fn set_snap_to_ticks(&mut self, enabled: bool) {
        if self.snap_to_ticks == enabled {
            return;
        }
        self.snap_to_ticks = enabled;
        self.renormalize();
        self.request_redraw();
    }

    pub fn shows_tick_marks(&self) -> bool {
        self.show_tick_marks
    }

    pub fn set_show_tick_marks(&mut self, visible: bool) {
        if self.show_tick_marks != visible {
            self.show_tick_marks = visible;
            self.request_redraw();
        }
    }

    pub fn shows_value_label(&self) -> bool {
        self.show_value_label
    }

    pub fn set_show_value_label(&mut self, visible: bool) {
        if self.show_value_label != visible {
            self.show_value_label = visible;
            self.request_redraw();
        }
    }

    pub fn label_font(&self) -> &LabelFont {
        &self.label_font
    }

    pub fn set_label_font(&mut self, font: LabelFont) {
        if self.label_font != font {
            self.label_font = font;
            self.request_redraw();
        }
    }

    /// Readout such as `"30.0°"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.range
    }

    pub fn set_range_policy(&mut self, range: RangePolicy) {
        if let RangePolicy::Clamp { min, max } = range
            && let Err(e) = RangePolicy::clamp(min, max)
        {
            log::warn!("{}", e);
            return;
        }
        if self.range == range {
            return;
        }
        self.range = range;
        self.renormalize();
        self.request_redraw();
    }

    pub fn release_outside_blurs(&self) -> bool {
        self.release_outside_blurs
    }

    pub fn set_release_outside_blurs(&mut self, enabled: bool) {
        self.release_outside_blurs = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.request_redraw();
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Called by the host once its focus machinery has (or has not) granted focus.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.emit(KnobEvent::FocusChanged(focused));
            self.request_redraw();
        }
    }

    pub fn geometry(&self) -> &DialGeometry {
        &self.geometry
    }

    /// Unit vector from the center towards the current rotation.
    pub fn direction(&self) -> [f64; 2] {
        self.direction
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&KnobEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: KnobEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub(crate) fn request_redraw(&mut self) {
        self.emit(KnobEvent::RedrawRequested);
    }
}

impl Default for Knob {
    fn default() -> Self {
        Self::new(crate::geometry::DEFAULT_DIAMETER)
    }
}
