use crate::grid::Pos;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

/// Half side of a square key.
pub const A_S_DEFAULT: f64 = 1.0;
/// Centre of a hex key to the middle of its side.
pub const A_H_DEFAULT: f64 = 0.537634;
/// Centre of a hex key to the middle of the side shared with the row below.
pub const B_H_DEFAULT: f64 = 0.930605;

/// Built-in metric names as they appear on the command line and in JSON.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Square,
    Hex,
}

pub type DistanceFn = Arc<dyn Fn(Pos, Pos) -> f64 + Send + Sync>;

/// Distance between two grid cells, resolved once at configuration time.
#[derive(Clone)]
pub enum DistanceMetric {
    Square { half_width: f64 },
    Hex { a: f64, b: f64 },
    Custom(DistanceFn),
}

impl fmt::Debug for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square { half_width } => f
                .debug_struct("Square")
                .field("half_width", half_width)
                .finish(),
            Self::Hex { a, b } => f.debug_struct("Hex").field("a", a).field("b", b).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Default for DistanceMetric {
    fn default() -> Self {
        Self::Square {
            half_width: A_S_DEFAULT,
        }
    }
}

impl DistanceMetric {
    pub fn from_kind(kind: MetricKind, a_s: f64, a_h: f64, b_h: f64) -> Self {
        match kind {
            MetricKind::Square => Self::Square { half_width: a_s },
            MetricKind::Hex => Self::Hex { a: a_h, b: b_h },
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Pos, Pos) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    #[inline(always)]
    pub fn distance(&self, p1: Pos, p2: Pos) -> f64 {
        match self {
            Self::Square { half_width } => square_dist(p1, p2, *half_width),
            Self::Hex { a, b } => hex_dist(p1, p2, *a, *b),
            Self::Custom(f) => f(p1, p2),
        }
    }
}

/// Euclidean distance between cell coordinates, scaled by the half key width.
#[inline(always)]
pub fn square_dist(p1: Pos, p2: Pos, half_width: f64) -> f64 {
    let dr = p1.row as f64 - p2.row as f64;
    let dc = p1.col as f64 - p2.col as f64;
    half_width * (dr * dr + dc * dc).sqrt()
}

/// Distance on an offset hex grid where odd rows are shifted by half a key.
#[inline(always)]
pub fn hex_dist(p1: Pos, p2: Pos, a: f64, b: f64) -> f64 {
    let parity = (p1.row % 2) as f64 - (p2.row % 2) as f64;
    let h = 2.0 * (p1.col as f64 - p2.col as f64) - parity;
    let v = p1.row as f64 - p2.row as f64;
    ((a * h).powi(2) + (b * v).powi(2)).sqrt()
}
