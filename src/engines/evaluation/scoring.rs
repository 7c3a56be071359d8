use serde::{Deserialize, Serialize};
use std::fmt;

use super::quadrants::{quadrant_score, Quadrants};
use crate::config::fitness::{Coefficient, FitnessConfig, LegPolicy};
use crate::types::{Effort, Height, Joint, NUM_ANGLES};
use crate::utils::random::really_close;

/// Limb-coordination pattern recognised by the Bartenieff factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BartenieffPattern {
    Distal,
    Medial,
    Homolateral,
    Contralateral,
    Homologous,
    Unclassified,
}

impl BartenieffPattern {
    pub fn coefficient(self) -> Option<Coefficient> {
        match self {
            BartenieffPattern::Distal => Some(Coefficient::BartenieffDistal),
            BartenieffPattern::Medial => Some(Coefficient::BartenieffMedial),
            BartenieffPattern::Homolateral => Some(Coefficient::BartenieffHomolateral),
            BartenieffPattern::Contralateral => Some(Coefficient::BartenieffContralateral),
            BartenieffPattern::Homologous => Some(Coefficient::BartenieffHomologous),
            BartenieffPattern::Unclassified => None,
        }
    }
}

impl fmt::Display for BartenieffPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortTier {
    Low,
    Medium,
    High,
}

impl EffortTier {
    pub fn coefficient(self) -> Coefficient {
        match self {
            EffortTier::Low => Coefficient::EffortLow,
            EffortTier::Medium => Coefficient::EffortMedium,
            EffortTier::High => Coefficient::EffortHigh,
        }
    }
}

/// Every intermediate value that went into a fitness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub pattern: BartenieffPattern,
    pub bartenieff_factor: f64,
    pub effort_tier: EffortTier,
    pub effort_factor: f64,
    pub height_factor: f64,
    pub quadrant_score: u32,
    pub adjusted_quadrant_score: u32,
    pub score: f64,
}

fn q(quadrants: &Quadrants, joint: Joint) -> u8 {
    quadrants[joint.index()]
}

fn a(angles: &[f64; NUM_ANGLES], joint: Joint) -> f64 {
    angles[joint.index()]
}

/// Each limb's upper and lower segment sit in the same quadrant
fn limbs_aligned(quadrants: &Quadrants) -> bool {
    q(quadrants, Joint::LeftShoulderToElbow) == q(quadrants, Joint::LeftElbowToWrist)
        && q(quadrants, Joint::RightShoulderToElbow) == q(quadrants, Joint::RightElbowToWrist)
        && q(quadrants, Joint::LeftHipToKnee) == q(quadrants, Joint::LeftKneeToFoot)
        && q(quadrants, Joint::RightHipToKnee) == q(quadrants, Joint::RightKneeToFoot)
}

/// Arm segments differ from the given leg segments by more than `critical` radians
fn arm_opposes_leg(
    angles: &[f64; NUM_ANGLES],
    arm: (Joint, Joint),
    leg: (Joint, Joint),
    critical: f64,
) -> bool {
    (a(angles, arm.0) - a(angles, leg.0)).abs() > critical
        && (a(angles, arm.1) - a(angles, leg.1)).abs() > critical
}

const LEFT_ARM: (Joint, Joint) = (Joint::LeftShoulderToElbow, Joint::LeftElbowToWrist);
const RIGHT_ARM: (Joint, Joint) = (Joint::RightShoulderToElbow, Joint::RightElbowToWrist);
const LEFT_LEG: (Joint, Joint) = (Joint::LeftHipToKnee, Joint::LeftKneeToFoot);
const RIGHT_LEG: (Joint, Joint) = (Joint::RightHipToKnee, Joint::RightKneeToFoot);

/// Classify the pose; the first matching pattern wins.
pub fn classify_bartenieff(
    angles: &[f64; NUM_ANGLES],
    quadrants: &Quadrants,
    critical_angle: f64,
) -> BartenieffPattern {
    let score = quadrant_score(quadrants);
    let aligned = limbs_aligned(quadrants);

    if score == 8 && aligned {
        return BartenieffPattern::Distal;
    }
    if score == 12 && aligned {
        return BartenieffPattern::Medial;
    }
    if arm_opposes_leg(angles, LEFT_ARM, LEFT_LEG, critical_angle)
        || arm_opposes_leg(angles, RIGHT_ARM, RIGHT_LEG, critical_angle)
    {
        return BartenieffPattern::Homolateral;
    }
    if arm_opposes_leg(angles, LEFT_ARM, RIGHT_LEG, critical_angle)
        || arm_opposes_leg(angles, RIGHT_ARM, LEFT_LEG, critical_angle)
    {
        return BartenieffPattern::Contralateral;
    }

    let arms_mirror = q(quadrants, LEFT_ARM.0) == q(quadrants, RIGHT_ARM.0)
        && q(quadrants, LEFT_ARM.1) == q(quadrants, RIGHT_ARM.1);
    let legs_mirror = q(quadrants, LEFT_LEG.0) == q(quadrants, RIGHT_LEG.0)
        && q(quadrants, LEFT_LEG.1) == q(quadrants, RIGHT_LEG.1);
    if arms_mirror || legs_mirror {
        return BartenieffPattern::Homologous;
    }

    BartenieffPattern::Unclassified
}

pub fn classify_effort(effort: &Effort) -> EffortTier {
    if *effort == Effort::INDULGING || *effort == Effort::FIGHTING {
        return EffortTier::Low;
    }

    let [weight, space, time, flow] = effort.as_reals();
    let paired = (really_close(weight, space) && really_close(time, flow))
        || (really_close(weight, time) && really_close(space, flow))
        || (really_close(weight, flow) && really_close(space, time));

    if paired {
        EffortTier::Medium
    } else {
        EffortTier::High
    }
}

/// Bonus added to the quadrant score before the final multiply
pub fn height_adjustment(height: Height) -> u32 {
    match height {
        Height::Low | Height::Middle | Height::High => 1,
        Height::MidLow | Height::MidHigh => 3,
    }
}

pub fn height_factor(height: Height, quadrants: &Quadrants, config: &FitnessConfig) -> f64 {
    if !height.is_intermediate() {
        return 0.0;
    }

    match config.leg_policy {
        LegPolicy::Collapsed => config.get(Coefficient::UnextendedLegs),
        LegPolicy::Tiered => {
            let extended = |joint: Joint| matches!(q(quadrants, joint), 1 | 2);
            if extended(Joint::LeftHipToKnee) || extended(Joint::RightHipToKnee) {
                config.get(Coefficient::FullyExtendedLeg)
            } else if extended(Joint::LeftKneeToFoot) || extended(Joint::RightKneeToFoot) {
                config.get(Coefficient::LowerLegExtended)
            } else {
                config.get(Coefficient::UnextendedLegs)
            }
        }
    }
}

/// Score a pose: (bartenieff + effort + height) x adjusted quadrant score
pub fn evaluate(
    angles: &[f64; NUM_ANGLES],
    quadrants: &Quadrants,
    effort: &Effort,
    height: Height,
    config: &FitnessConfig,
) -> FitnessBreakdown {
    let pattern = classify_bartenieff(angles, quadrants, config.critical_angle_radians());
    let bartenieff_factor = pattern.coefficient().map_or(0.0, |c| config.get(c));

    let effort_tier = classify_effort(effort);
    let effort_factor = config.get(effort_tier.coefficient());

    let height_factor = height_factor(height, quadrants, config);

    let raw = quadrant_score(quadrants);
    let adjusted = raw + height_adjustment(height);

    FitnessBreakdown {
        pattern,
        bartenieff_factor,
        effort_tier,
        effort_factor,
        height_factor,
        quadrant_score: raw,
        adjusted_quadrant_score: adjusted,
        score: (bartenieff_factor + effort_factor + height_factor) * f64::from(adjusted),
    }
}
