//! Mode settings and the graph window.

use serde::{Deserialize, Serialize};

/// Angle unit for the trigonometric functions.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    Radian,
    Degree,
}

/// Number display format. Display itself is outside the core; the
/// setting is carried for embedders.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum NumberFormat {
    #[default]
    Float,
    /// Fixed decimal places, 0–9.
    Fix(u8),
    Sci,
    Eng,
}

/// Graphing mode.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum GraphMode {
    #[default]
    Function,
    Parametric,
    Polar,
    Sequence,
}

/// Complex result format.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum ComplexFormat {
    #[default]
    Real,
    Rectangular,
    Polar,
}

/// The full mode block.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ModeSettings {
    pub angle: AngleMode,
    pub number_format: NumberFormat,
    pub graph_mode: GraphMode,
    pub complex_format: ComplexFormat,
}

/// Graph-window parameters.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct WindowParams {
    pub x_min: f64,
    pub x_max: f64,
    pub x_scl: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub y_scl: f64,
    pub x_res: u32,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            x_scl: 1.0,
            y_min: -10.0,
            y_max: 10.0,
            y_scl: 1.0,
            x_res: 1,
        }
    }
}
