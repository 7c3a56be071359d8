//! Coarse quadrant buckets for individual joint angles
//!
//! Every joint has its own row of three ascending thresholds and four
//! quadrant labels. Left and right limbs use mirrored labels, and distal
//! joints (elbow/knee outward) work on a half-circle so their thresholds sit
//! at 45/90/135 degrees instead of 90/180/270.

use crate::types::{Joint, NUM_ANGLES};
use crate::utils::random::{radians_to_degrees, EPSILON};

pub type Quadrants = [u8; NUM_ANGLES];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadrantRow {
    pub thresholds: [f64; 3],
    pub quadrants: [u8; 4],
}

const MEDIAL_THRESHOLDS: [f64; 3] = [90.0, 180.0, 270.0];
const DISTAL_THRESHOLDS: [f64; 3] = [45.0, 90.0, 135.0];

pub fn quadrant_row(joint: Joint) -> QuadrantRow {
    let (thresholds, quadrants) = match joint {
        Joint::LeftShoulderToElbow => (MEDIAL_THRESHOLDS, [1, 2, 1, 4]),
        Joint::RightShoulderToElbow => (MEDIAL_THRESHOLDS, [2, 1, 4, 1]),
        Joint::LeftElbowToWrist => (DISTAL_THRESHOLDS, [1, 2, 1, 4]),
        Joint::RightElbowToWrist => (DISTAL_THRESHOLDS, [2, 1, 4, 1]),
        Joint::LeftHipToKnee => (MEDIAL_THRESHOLDS, [4, 1, 2, 1]),
        Joint::RightHipToKnee => (MEDIAL_THRESHOLDS, [1, 4, 1, 2]),
        Joint::LeftKneeToFoot => (DISTAL_THRESHOLDS, [4, 1, 2, 1]),
        Joint::RightKneeToFoot => (DISTAL_THRESHOLDS, [1, 4, 1, 2]),
    };
    QuadrantRow { thresholds, quadrants }
}

/// Map an angle in radians onto the joint's quadrant row.
///
/// The angle is nudged down by `EPSILON` degrees so an angle sitting exactly
/// on a threshold falls in the lower bucket even after radian round-off.
pub fn map_angle_to_quadrant(joint: Joint, angle: f64) -> u8 {
    let row = quadrant_row(joint);
    let degrees = radians_to_degrees(angle) - EPSILON;

    row.thresholds
        .iter()
        .position(|&threshold| degrees <= threshold)
        .map(|i| row.quadrants[i])
        .unwrap_or(row.quadrants[3])
}

pub fn determine_quadrants(angles: &[f64; NUM_ANGLES]) -> Quadrants {
    let mut quadrants = [0u8; NUM_ANGLES];
    for joint in Joint::ALL {
        quadrants[joint.index()] = map_angle_to_quadrant(joint, angles[joint.index()]);
    }
    quadrants
}

pub fn quadrant_score(quadrants: &Quadrants) -> u32 {
    quadrants.iter().map(|&q| u32::from(q)).sum()
}
