use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

use crate::geometry::DEFAULT_DIAMETER;

pub const FULL_TURN: f64 = 360.0;
pub const DEFAULT_TICK_SPACING: f64 = 10.0;
/// Keeps the cached tick list bounded (36 000 entries at most).
pub const MIN_TICK_SPACING: f64 = 0.01;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    #[default]
    #[strum(serialize = "Wrap", serialize = "w")]
    Wrap,
    #[strum(serialize = "Clamp", serialize = "c")]
    Clamp,
}

/// How the knob keeps its value inside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RangePolicy {
    /// Modulo 360, so the value stays in [0, 360).
    #[default]
    Wrap,
    /// Value is pinned to `[min, max]`.
    Clamp { min: f64, max: f64 },
}

impl RangePolicy {
    pub fn clamp(min: f64, max: f64) -> Result<Self, OptionsError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(OptionsError::InvalidRange { min, max });
        }
        Ok(Self::Clamp { min, max })
    }

    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Wrap => (0.0, FULL_TURN),
            Self::Clamp { min, max } => (min, max),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct FontFamily(String);

crate::string_newtype!(FontFamily);

#[derive(Debug, Clone, PartialEq)]
pub struct LabelFont {
    pub family: FontFamily,
    pub size: f64,
}

impl Default for LabelFont {
    fn default() -> Self {
        Self {
            family: FontFamily::from("Sans"),
            size: 13.0,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("Diameter must be a positive number, got {0}")]
    InvalidDiameter(f64),
    #[error("Tick spacing must be in [0.01, 360], got {0}")]
    InvalidTickSpacing(f64),
    #[error("Invalid range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },
    #[error("Font size must be a positive number, got {0}")]
    InvalidFontSize(f64),
    #[error("Initial value must be finite, got {0}")]
    NonFiniteValue(f64),
}

pub fn check_tick_spacing(spacing: f64) -> Result<f64, OptionsError> {
    if (MIN_TICK_SPACING..=FULL_TURN).contains(&spacing) {
        Ok(spacing)
    } else {
        Err(OptionsError::InvalidTickSpacing(spacing))
    }
}

/// Every configurable knob setting, as read from a config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KnobOptions {
    pub diameter: f64,
    pub tick_spacing: f64,
    pub snap_to_ticks: bool,
    pub show_tick_marks: bool,
    pub show_value_label: bool,
    pub font_family: FontFamily,
    pub font_size: f64,
    pub boundary: BoundaryMode,
    pub min: f64,
    pub max: f64,
    /// Drop focus when the pointer is released outside the dial.
    pub release_outside_blurs: bool,
    pub initial_value: f64,
}

impl Default for KnobOptions {
    fn default() -> Self {
        let font = LabelFont::default();
        Self {
            diameter: DEFAULT_DIAMETER,
            tick_spacing: DEFAULT_TICK_SPACING,
            snap_to_ticks: false,
            show_tick_marks: false,
            show_value_label: false,
            font_family: font.family,
            font_size: font.size,
            boundary: BoundaryMode::Wrap,
            min: 0.0,
            max: FULL_TURN,
            release_outside_blurs: false,
            initial_value: 0.0,
        }
    }
}

impl KnobOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.diameter.is_finite() || self.diameter <= 0.0 {
            return Err(OptionsError::InvalidDiameter(self.diameter));
        }
        check_tick_spacing(self.tick_spacing)?;
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(OptionsError::InvalidFontSize(self.font_size));
        }
        if !self.initial_value.is_finite() {
            return Err(OptionsError::NonFiniteValue(self.initial_value));
        }
        self.range_policy().map(|_| ())
    }

    pub fn range_policy(&self) -> Result<RangePolicy, OptionsError> {
        match self.boundary {
            BoundaryMode::Wrap => Ok(RangePolicy::Wrap),
            BoundaryMode::Clamp => RangePolicy::clamp(self.min, self.max),
        }
    }

    pub fn label_font(&self) -> LabelFont {
        LabelFont {
            family: self.font_family.clone(),
            size: self.font_size,
        }
    }
}
