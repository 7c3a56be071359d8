use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{LabanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const COEFFICIENT_MIN: f64 = 0.0;
const COEFFICIENT_MAX: f64 = 10.0;

/// A named real coefficient held inside `[min, max]`
///
/// Writes outside the range are clamped rather than rejected. The default is
/// also the value restored by [`FitnessParameter::reset`]. Bounds and default
/// are fixed in code; configuration files only carry the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessParameter {
    min: f64,
    max: f64,
    default: f64,
    value: f64,
}

impl FitnessParameter {
    pub fn new(min: f64, max: f64, default: f64) -> Result<Self> {
        if !(min < max) {
            return Err(LabanError::Configuration(format!(
                "Parameter bounds must satisfy min < max, got [{}, {}]",
                min, max
            )));
        }
        let mut parameter = Self { min, max, default, value: min };
        parameter.reset();
        Ok(parameter)
    }

    /// Coefficient on the standard [0, 10] scale
    const fn standard(default: f64) -> Self {
        Self {
            min: COEFFICIENT_MIN,
            max: COEFFICIENT_MAX,
            default,
            value: default,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// NaN is ignored and leaves the current value in place.
    pub fn set_value(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.value = value.max(self.min).min(self.max);
    }

    pub fn reset(&mut self) {
        self.set_value(self.default);
    }

    fn check(&self, name: &str) -> Result<()> {
        if !(self.min < self.max) {
            return Err(LabanError::Configuration(format!(
                "{}: bounds must satisfy min < max, got [{}, {}]",
                name, self.min, self.max
            )));
        }
        if !(self.min..=self.max).contains(&self.value) {
            return Err(LabanError::Configuration(format!(
                "{}: value {} outside [{}, {}]",
                name, self.value, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// The tunable fitness coefficients, one per scoring category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coefficient {
    BartenieffContralateral,
    BartenieffDistal,
    BartenieffHomolateral,
    BartenieffHomologous,
    BartenieffMedial,
    EffortHigh,
    EffortLow,
    EffortMedium,
    FullyExtendedLeg,
    LowerLegExtended,
    UnextendedLegs,
}

impl Coefficient {
    pub const ALL: [Coefficient; 11] = [
        Coefficient::BartenieffContralateral,
        Coefficient::BartenieffDistal,
        Coefficient::BartenieffHomolateral,
        Coefficient::BartenieffHomologous,
        Coefficient::BartenieffMedial,
        Coefficient::EffortHigh,
        Coefficient::EffortLow,
        Coefficient::EffortMedium,
        Coefficient::FullyExtendedLeg,
        Coefficient::LowerLegExtended,
        Coefficient::UnextendedLegs,
    ];

    /// Key used in configuration files
    pub fn key(self) -> &'static str {
        match self {
            Coefficient::BartenieffContralateral => "bartenieff_contralateral",
            Coefficient::BartenieffDistal => "bartenieff_distal",
            Coefficient::BartenieffHomolateral => "bartenieff_homolateral",
            Coefficient::BartenieffHomologous => "bartenieff_homologous",
            Coefficient::BartenieffMedial => "bartenieff_medial",
            Coefficient::EffortHigh => "effort_high",
            Coefficient::EffortLow => "effort_low",
            Coefficient::EffortMedium => "effort_medium",
            Coefficient::FullyExtendedLeg => "fully_extended_leg",
            Coefficient::LowerLegExtended => "lower_leg_extended",
            Coefficient::UnextendedLegs => "unextended_legs",
        }
    }

    pub fn from_key(key: &str) -> Option<Coefficient> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn initial_value(self) -> f64 {
        match self {
            Coefficient::BartenieffContralateral => 1.3,
            Coefficient::BartenieffDistal => 0.4,
            Coefficient::BartenieffHomolateral => 0.5,
            Coefficient::BartenieffHomologous => 0.4,
            Coefficient::BartenieffMedial => 0.7,
            Coefficient::EffortHigh => 1.4,
            Coefficient::EffortLow => 0.6,
            Coefficient::EffortMedium => 1.2,
            Coefficient::FullyExtendedLeg => 1.1,
            Coefficient::LowerLegExtended => 1.3,
            Coefficient::UnextendedLegs => 0.3,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Coefficient::BartenieffContralateral => "Weight for cross-lateral arm/leg opposition",
            Coefficient::BartenieffDistal => "Weight for limbs reaching out from their ends",
            Coefficient::BartenieffHomolateral => "Weight for same-side arm/leg opposition",
            Coefficient::BartenieffHomologous => "Weight for mirrored arms or mirrored legs",
            Coefficient::BartenieffMedial => "Weight for limbs gathered toward the core",
            Coefficient::EffortHigh => "Weight for mixed Effort combinations",
            Coefficient::EffortLow => "Weight for all-indulging or all-fighting Effort",
            Coefficient::EffortMedium => "Weight for Effort qualities that pair up",
            Coefficient::FullyExtendedLeg => "Tiered policy: a thigh is extended",
            Coefficient::LowerLegExtended => "Tiered policy: only a lower leg is extended",
            Coefficient::UnextendedLegs => "Weight for bent legs at intermediate heights",
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How leg extension feeds the height factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegPolicy {
    /// Any intermediate height earns the unextended-legs weight
    Collapsed,
    /// Intermediate heights are graded by which leg segments are extended.
    ///
    /// A hip-to-knee segment in quadrant 1 or 2 earns the fully-extended
    /// weight; failing that, a knee-to-foot segment there earns the
    /// lower-leg weight. An extended lower leg alone never counts as a fully
    /// extended leg.
    Tiered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FitnessFile", into = "FitnessFile")]
pub struct FitnessConfig {
    pub bartenieff_contralateral: FitnessParameter,
    pub bartenieff_distal: FitnessParameter,
    pub bartenieff_homolateral: FitnessParameter,
    pub bartenieff_homologous: FitnessParameter,
    pub bartenieff_medial: FitnessParameter,
    pub effort_high: FitnessParameter,
    pub effort_low: FitnessParameter,
    pub effort_medium: FitnessParameter,
    pub fully_extended_leg: FitnessParameter,
    pub lower_leg_extended: FitnessParameter,
    pub unextended_legs: FitnessParameter,
    pub leg_policy: LegPolicy,
    /// Minimum angle difference (degrees) that counts as limb opposition
    pub critical_angle_degrees: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        let standard = |c: Coefficient| FitnessParameter::standard(c.initial_value());
        Self {
            bartenieff_contralateral: standard(Coefficient::BartenieffContralateral),
            bartenieff_distal: standard(Coefficient::BartenieffDistal),
            bartenieff_homolateral: standard(Coefficient::BartenieffHomolateral),
            bartenieff_homologous: standard(Coefficient::BartenieffHomologous),
            bartenieff_medial: standard(Coefficient::BartenieffMedial),
            effort_high: standard(Coefficient::EffortHigh),
            effort_low: standard(Coefficient::EffortLow),
            effort_medium: standard(Coefficient::EffortMedium),
            fully_extended_leg: standard(Coefficient::FullyExtendedLeg),
            lower_leg_extended: standard(Coefficient::LowerLegExtended),
            unextended_legs: standard(Coefficient::UnextendedLegs),
            leg_policy: LegPolicy::Collapsed,
            critical_angle_degrees: 30.0,
        }
    }
}

/// On-disk form of [`FitnessConfig`]: one plain value per coefficient
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessFile {
    bartenieff_contralateral: f64,
    bartenieff_distal: f64,
    bartenieff_homolateral: f64,
    bartenieff_homologous: f64,
    bartenieff_medial: f64,
    effort_high: f64,
    effort_low: f64,
    effort_medium: f64,
    fully_extended_leg: f64,
    lower_leg_extended: f64,
    unextended_legs: f64,
    leg_policy: LegPolicy,
    critical_angle_degrees: f64,
}

impl Default for FitnessFile {
    fn default() -> Self {
        FitnessConfig::default().into()
    }
}

impl From<FitnessConfig> for FitnessFile {
    fn from(config: FitnessConfig) -> Self {
        Self {
            bartenieff_contralateral: config.bartenieff_contralateral.value(),
            bartenieff_distal: config.bartenieff_distal.value(),
            bartenieff_homolateral: config.bartenieff_homolateral.value(),
            bartenieff_homologous: config.bartenieff_homologous.value(),
            bartenieff_medial: config.bartenieff_medial.value(),
            effort_high: config.effort_high.value(),
            effort_low: config.effort_low.value(),
            effort_medium: config.effort_medium.value(),
            fully_extended_leg: config.fully_extended_leg.value(),
            lower_leg_extended: config.lower_leg_extended.value(),
            unextended_legs: config.unextended_legs.value(),
            leg_policy: config.leg_policy,
            critical_angle_degrees: config.critical_angle_degrees,
        }
    }
}

// Values go through `set_value`, so out-of-range entries clamp
impl From<FitnessFile> for FitnessConfig {
    fn from(file: FitnessFile) -> Self {
        let mut config = FitnessConfig {
            leg_policy: file.leg_policy,
            critical_angle_degrees: file.critical_angle_degrees,
            ..FitnessConfig::default()
        };
        config.bartenieff_contralateral.set_value(file.bartenieff_contralateral);
        config.bartenieff_distal.set_value(file.bartenieff_distal);
        config.bartenieff_homolateral.set_value(file.bartenieff_homolateral);
        config.bartenieff_homologous.set_value(file.bartenieff_homologous);
        config.bartenieff_medial.set_value(file.bartenieff_medial);
        config.effort_high.set_value(file.effort_high);
        config.effort_low.set_value(file.effort_low);
        config.effort_medium.set_value(file.effort_medium);
        config.fully_extended_leg.set_value(file.fully_extended_leg);
        config.lower_leg_extended.set_value(file.lower_leg_extended);
        config.unextended_legs.set_value(file.unextended_legs);
        config
    }
}

impl FitnessConfig {
    pub fn parameter(&self, coefficient: Coefficient) -> &FitnessParameter {
        match coefficient {
            Coefficient::BartenieffContralateral => &self.bartenieff_contralateral,
            Coefficient::BartenieffDistal => &self.bartenieff_distal,
            Coefficient::BartenieffHomolateral => &self.bartenieff_homolateral,
            Coefficient::BartenieffHomologous => &self.bartenieff_homologous,
            Coefficient::BartenieffMedial => &self.bartenieff_medial,
            Coefficient::EffortHigh => &self.effort_high,
            Coefficient::EffortLow => &self.effort_low,
            Coefficient::EffortMedium => &self.effort_medium,
            Coefficient::FullyExtendedLeg => &self.fully_extended_leg,
            Coefficient::LowerLegExtended => &self.lower_leg_extended,
            Coefficient::UnextendedLegs => &self.unextended_legs,
        }
    }

    pub fn parameter_mut(&mut self, coefficient: Coefficient) -> &mut FitnessParameter {
        match coefficient {
            Coefficient::BartenieffContralateral => &mut self.bartenieff_contralateral,
            Coefficient::BartenieffDistal => &mut self.bartenieff_distal,
            Coefficient::BartenieffHomolateral => &mut self.bartenieff_homolateral,
            Coefficient::BartenieffHomologous => &mut self.bartenieff_homologous,
            Coefficient::BartenieffMedial => &mut self.bartenieff_medial,
            Coefficient::EffortHigh => &mut self.effort_high,
            Coefficient::EffortLow => &mut self.effort_low,
            Coefficient::EffortMedium => &mut self.effort_medium,
            Coefficient::FullyExtendedLeg => &mut self.fully_extended_leg,
            Coefficient::LowerLegExtended => &mut self.lower_leg_extended,
            Coefficient::UnextendedLegs => &mut self.unextended_legs,
        }
    }

    pub fn get(&self, coefficient: Coefficient) -> f64 {
        self.parameter(coefficient).value()
    }

    pub fn set(&mut self, coefficient: Coefficient, value: f64) {
        self.parameter_mut(coefficient).set_value(value);
    }

    pub fn reset(&mut self, coefficient: Coefficient) {
        self.parameter_mut(coefficient).reset();
    }

    /// Restore every coefficient to its default; the leg policy is left alone.
    pub fn reset_all(&mut self) {
        for coefficient in Coefficient::ALL {
            self.reset(coefficient);
        }
    }

    pub fn critical_angle_radians(&self) -> f64 {
        self.critical_angle_degrees.to_radians()
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<()> {
        for coefficient in Coefficient::ALL {
            self.parameter(coefficient).check(coefficient.key())?;
        }
        if !(0.0..=180.0).contains(&self.critical_angle_degrees) {
            return Err(LabanError::Configuration(
                "Critical angle must be between 0 and 180 degrees".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let mut fields: Vec<FieldManifest> = Coefficient::ALL
            .iter()
            .map(|&c| {
                let parameter = self.parameter(c);
                let (min, max) = parameter.range();
                FieldManifest {
                    name: c.key().to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(parameter.default_value()),
                    min: Some(min),
                    max: Some(max),
                    description: c.description().to_string(),
                }
            })
            .collect();

        fields.push(FieldManifest {
            name: "leg_policy".to_string(),
            field_type: "enum".to_string(),
            default: serde_json::json!(LegPolicy::Collapsed),
            min: None,
            max: None,
            description: "Collapsed or Tiered leg-extension scoring".to_string(),
        });
        fields.push(FieldManifest {
            name: "critical_angle_degrees".to_string(),
            field_type: "float".to_string(),
            default: serde_json::json!(30.0),
            min: Some(0.0),
            max: Some(180.0),
            description: "Angle difference treated as limb opposition".to_string(),
        });

        ConfigManifest {
            section: "Fitness".to_string(),
            fields,
        }
    }
}
