use context_error::{BasicKind, BoxedError, Context, CreateError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Mass, Ratio},
    mass::dalton,
    ratio::part_per_million,
};

use crate::mass::{
    DALTON_TO_PPM_REFERENCE, PPM_TO_DALTON_REFERENCE, dalton_to_ppm, ppm_to_dalton,
};

/// The unit a tolerance was specified in
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ToleranceUnit {
    /// An absolute tolerance in Dalton
    #[default]
    Dalton,
    /// A relative tolerance in parts per million
    Ppm,
}

impl ToleranceUnit {
    /// Interpret a unit code, `0` is Dalton and `1` is ppm. Any other code is interpreted as Dalton
    /// but gives a warning.
    fn from_code(
        code: i32,
        parameter: &str,
        context: &Context<'static>,
        warnings: &mut Vec<BoxedError<'static, BasicKind>>,
    ) -> Self {
        match code {
            0 => Self::Dalton,
            1 => Self::Ppm,
            other => {
                warnings.push(BoxedError::new(
                    BasicKind::Warning,
                    "Unknown tolerance unit",
                    format!(
                        "The unit code '{other}' for '{parameter}' is not 0 (Dalton) or 1 (ppm), the tolerance is interpreted as Dalton"
                    ),
                    context.clone(),
                ));
                Self::Dalton
            }
        }
    }
}

impl std::fmt::Display for ToleranceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dalton => write!(f, "Da"),
            Self::Ppm => write!(f, "ppm"),
        }
    }
}

/// A precursor tolerance window as read from a parameter file, before it is simplified into a
/// [`PrecursorTolerance`]
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ToleranceWindow {
    /// The lower bound, as given (generally negative)
    pub lower: f64,
    /// The upper bound, as given
    pub upper: f64,
    /// The unit for both bounds
    pub unit: ToleranceUnit,
    /// If the window was given as a single (symmetric) value
    pub single_tolerance: bool,
}

impl ToleranceWindow {
    /// Read the precursor tolerance from the parameters, either the current form with a lower and
    /// upper bound (`precursor_mass_lower`, `precursor_mass_upper`, `precursor_mass_units`) or the
    /// legacy single value (`precursor_true_tolerance`, `precursor_true_units`). The first complete
    /// and parsable form is used, `None` if neither is available. Warnings are given the `context`
    /// (generally the parameter file).
    pub fn resolve(
        parameters: &IndexMap<String, String>,
        context: &Context<'static>,
        warnings: &mut Vec<BoxedError<'static, BasicKind>>,
    ) -> Option<Self> {
        let number = |key: &str| {
            parameters
                .get(key)
                .and_then(|value| value.trim().parse::<f64>().ok())
        };
        let code = |key: &str| {
            parameters
                .get(key)
                .and_then(|value| value.trim().parse::<i32>().ok())
        };

        if let (Some(lower), Some(upper), Some(units)) = (
            number("precursor_mass_lower"),
            number("precursor_mass_upper"),
            code("precursor_mass_units"),
        ) {
            Some(Self {
                lower,
                upper,
                unit: ToleranceUnit::from_code(
                    units,
                    "precursor_mass_units",
                    context,
                    warnings,
                ),
                single_tolerance: false,
            })
        } else if let (Some(tolerance), Some(units)) = (
            number("precursor_true_tolerance"),
            code("precursor_true_units"),
        ) {
            Some(Self {
                lower: tolerance,
                upper: tolerance,
                unit: ToleranceUnit::from_code(
                    units,
                    "precursor_true_units",
                    context,
                    warnings,
                ),
                single_tolerance: true,
            })
        } else {
            None
        }
    }

    /// The magnitude of the window. If both bounds have the same magnitude this is that magnitude,
    /// otherwise this is the mean of both magnitudes, so an asymmetric window is not preserved.
    pub fn magnitude(&self) -> f64 {
        if (self.lower.abs() - self.upper.abs()).abs() < f64::EPSILON {
            self.upper.abs()
        } else {
            f64::midpoint(self.lower.abs(), self.upper.abs())
        }
    }

    /// Get the tolerance in both units. The declared unit is stored as is, the other unit is
    /// derived at 2000 Da (ppm to Dalton) or at 1000 Da (Dalton to ppm).
    pub fn precursor_tolerance(&self) -> PrecursorTolerance {
        let value = self.magnitude();
        match self.unit {
            ToleranceUnit::Dalton => {
                let mass = Mass::new::<dalton>(value);
                PrecursorTolerance {
                    mass,
                    ppm: dalton_to_ppm(mass, Mass::new::<dalton>(DALTON_TO_PPM_REFERENCE)),
                    unit: ToleranceUnit::Dalton,
                }
            }
            ToleranceUnit::Ppm => {
                let ppm = Ratio::new::<part_per_million>(value);
                PrecursorTolerance {
                    mass: ppm_to_dalton(ppm, Mass::new::<dalton>(PPM_TO_DALTON_REFERENCE)),
                    ppm,
                    unit: ToleranceUnit::Ppm,
                }
            }
        }
    }
}

/// A symmetric precursor mass tolerance, always available in both Dalton and ppm
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct PrecursorTolerance {
    /// The tolerance in Dalton
    pub mass: Mass,
    /// The tolerance in ppm
    pub ppm: Ratio,
    /// The unit the tolerance was originally given in
    pub unit: ToleranceUnit,
}

impl Default for PrecursorTolerance {
    fn default() -> Self {
        Self {
            mass: Mass::new::<dalton>(0.0),
            ppm: Ratio::new::<part_per_million>(0.0),
            unit: ToleranceUnit::Dalton,
        }
    }
}

impl PrecursorTolerance {
    /// The tolerance in Dalton
    pub fn dalton(&self) -> f64 {
        self.mass.get::<dalton>()
    }

    /// The tolerance in ppm
    pub fn ppm(&self) -> f64 {
        self.ppm.get::<part_per_million>()
    }
}

impl std::fmt::Display for PrecursorTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            ToleranceUnit::Dalton => write!(f, "±{} Da ({} ppm)", self.dalton(), self.ppm()),
            ToleranceUnit::Ppm => write!(f, "±{} ppm ({} Da)", self.ppm(), self.dalton()),
        }
    }
}
