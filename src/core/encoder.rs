//! Magnitude to visual encoding.

use crate::domain::model::{ColorBucket, LegendEntry};

/// Meters of circle radius per unit of magnitude.
pub const RADIUS_SCALE: f64 = 25_000.0;

/// Legend grades; each labels the bucket just above it.
const LEGEND_GRADES: [u8; 6] = [0, 1, 2, 3, 4, 5];

/// Circle radius for a magnitude. Linear and unclamped, so negative
/// magnitudes give negative radii.
pub fn radius(magnitude: f64) -> f64 {
    magnitude * RADIUS_SCALE
}

/// Color bucket for a magnitude. Thresholds use strict `>`, so a boundary
/// value such as `5.0` lands in the lower bucket.
pub fn color(magnitude: f64) -> ColorBucket {
    if magnitude > 5.0 {
        ColorBucket::Darkest
    } else if magnitude > 4.0 {
        ColorBucket::DarkOrange
    } else if magnitude > 3.0 {
        ColorBucket::Orange
    } else if magnitude > 2.0 {
        ColorBucket::MidOrange
    } else if magnitude > 1.0 {
        ColorBucket::LightOrange
    } else {
        ColorBucket::Lightest
    }
}

pub fn legend_entries() -> Vec<LegendEntry> {
    LEGEND_GRADES
        .iter()
        .enumerate()
        .map(|(i, grade)| {
            let label = match LEGEND_GRADES.get(i + 1) {
                Some(next) => format!("{}–{}", grade, next),
                None => format!("{}+", grade),
            };
            LegendEntry {
                label,
                color: color(f64::from(*grade) + 1.0),
            }
        })
        .collect()
}
