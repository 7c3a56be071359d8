use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::random::really_close;

/// Number of joint angles carried by every skeleton
pub const NUM_ANGLES: usize = 8;

/// Laban Weight Effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weight {
    Light,
    Strong,
}

/// Laban Space Effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Space {
    Indirect,
    Direct,
}

/// Laban Time Effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Time {
    Sustained,
    Sudden,
}

/// Laban Flow Effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flow {
    Free,
    Bound,
}

/// Discrete height level of the figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Height {
    Low,
    MidLow,
    Middle,
    MidHigh,
    High,
}

// Two-valued qualities map the "indulging" pole to 0 and the "fighting" pole to 1.
macro_rules! binary_quality {
    ($ty:ident, $low:ident, $high:ident) => {
        impl $ty {
            pub const ALL: [$ty; 2] = [$ty::$low, $ty::$high];

            pub fn to_real(self) -> f64 {
                match self {
                    $ty::$low => 0.0,
                    $ty::$high => 1.0,
                }
            }

            /// Anything not within epsilon of 1 maps back to the low pole.
            pub fn from_real(value: f64) -> Self {
                if really_close(value, 1.0) {
                    $ty::$high
                } else {
                    $ty::$low
                }
            }

            pub fn from_coin(heads: bool) -> Self {
                if heads {
                    $ty::$high
                } else {
                    $ty::$low
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $ty::$low => stringify!($low),
                    $ty::$high => stringify!($high),
                };
                f.write_str(name)
            }
        }
    };
}

binary_quality!(Weight, Light, Strong);
binary_quality!(Space, Indirect, Direct);
binary_quality!(Time, Sustained, Sudden);
binary_quality!(Flow, Free, Bound);

impl Height {
    pub const ALL: [Height; 5] = [
        Height::Low,
        Height::MidLow,
        Height::Middle,
        Height::MidHigh,
        Height::High,
    ];

    pub fn to_real(self) -> f64 {
        match self {
            Height::Low => 0.0,
            Height::MidLow => 1.0,
            Height::Middle => 2.0,
            Height::MidHigh => 3.0,
            Height::High => 4.0,
        }
    }

    pub fn from_real(value: f64) -> Self {
        if really_close(value, 4.0) {
            Height::High
        } else if really_close(value, 3.0) {
            Height::MidHigh
        } else if really_close(value, 2.0) {
            Height::Middle
        } else if really_close(value, 1.0) {
            Height::MidLow
        } else {
            Height::Low
        }
    }

    /// Five equal-width bins over a uniform [0, 1) sample
    pub fn from_unit_sample(sample: f64) -> Self {
        if sample >= 0.8 {
            Height::High
        } else if sample >= 0.6 {
            Height::MidHigh
        } else if sample >= 0.4 {
            Height::Middle
        } else if sample >= 0.2 {
            Height::MidLow
        } else {
            Height::Low
        }
    }

    /// Levels reached with the legs bent
    pub fn is_intermediate(self) -> bool {
        matches!(self, Height::MidLow | Height::Middle | Height::MidHigh)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Height::Low => "Low",
            Height::MidLow => "MidLow",
            Height::Middle => "Middle",
            Height::MidHigh => "MidHigh",
            Height::High => "High",
        };
        f.write_str(name)
    }
}

/// The four Effort qualities taken together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effort {
    pub weight: Weight,
    pub space: Space,
    pub time: Time,
    pub flow: Flow,
}

impl Effort {
    pub const INDULGING: Effort = Effort {
        weight: Weight::Light,
        space: Space::Indirect,
        time: Time::Sustained,
        flow: Flow::Free,
    };

    pub const FIGHTING: Effort = Effort {
        weight: Weight::Strong,
        space: Space::Direct,
        time: Time::Sudden,
        flow: Flow::Bound,
    };

    pub fn as_reals(&self) -> [f64; 4] {
        [
            self.weight.to_real(),
            self.space.to_real(),
            self.time.to_real(),
            self.flow.to_real(),
        ]
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.weight, self.space, self.time, self.flow)
    }
}

/// Limb segments whose angles make up a skeleton, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    LeftHipToKnee,
    LeftKneeToFoot,
    RightHipToKnee,
    RightKneeToFoot,
    LeftShoulderToElbow,
    LeftElbowToWrist,
    RightShoulderToElbow,
    RightElbowToWrist,
}

impl Joint {
    pub const ALL: [Joint; NUM_ANGLES] = [
        Joint::LeftHipToKnee,
        Joint::LeftKneeToFoot,
        Joint::RightHipToKnee,
        Joint::RightKneeToFoot,
        Joint::LeftShoulderToElbow,
        Joint::LeftElbowToWrist,
        Joint::RightShoulderToElbow,
        Joint::RightElbowToWrist,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Joint> {
        Self::ALL.get(index).copied()
    }

    /// Segments attached to the torso (hip or shoulder)
    pub fn is_medial(self) -> bool {
        matches!(
            self,
            Joint::LeftHipToKnee
                | Joint::RightHipToKnee
                | Joint::LeftShoulderToElbow
                | Joint::RightShoulderToElbow
        )
    }

    /// Upper bound (exclusive) of the angle domain, in degrees
    pub fn max_degrees(self) -> f64 {
        if self.is_medial() {
            360.0
        } else {
            180.0
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::LeftHipToKnee => "left hip to knee",
            Joint::LeftKneeToFoot => "left knee to foot",
            Joint::RightHipToKnee => "right hip to knee",
            Joint::RightKneeToFoot => "right knee to foot",
            Joint::LeftShoulderToElbow => "left shoulder to elbow",
            Joint::LeftElbowToWrist => "left elbow to wrist",
            Joint::RightShoulderToElbow => "right shoulder to elbow",
            Joint::RightElbowToWrist => "right elbow to wrist",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
