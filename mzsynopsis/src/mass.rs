//! Mass conversions needed to interpret synopsis files

use uom::si::{
    f64::{Mass, Ratio},
    mass::dalton,
    ratio::part_per_million,
};

/// The mass of a proton in Dalton
pub const PROTON_MASS: f64 = 1.007_276_466_621;

/// The reference mass used to express a ppm tolerance in Dalton
pub const PPM_TO_DALTON_REFERENCE: f64 = 2000.0;

/// The reference mass used to express a Dalton tolerance in ppm
pub const DALTON_TO_PPM_REFERENCE: f64 = 1000.0;

/// Get the neutral mass of an ion with the given m/z and charge, assuming the charge carriers are
/// protons (or the lack thereof for negative charges). A charge of zero has no neutral mass.
pub fn neutral_mass_from_mz(mz: f64, charge: i16) -> Option<Mass> {
    if charge == 0 {
        None
    } else {
        let charge = f64::from(charge);
        Some(Mass::new::<dalton>(
            (mz - PROTON_MASS * charge.signum()) * charge.abs(),
        ))
    }
}

/// Express a ppm error as a Dalton error at the given reference mass
pub fn ppm_to_dalton(ppm: Ratio, reference: Mass) -> Mass {
    Mass::new::<dalton>(ppm.get::<part_per_million>() * reference.get::<dalton>() / 1e6)
}

/// Express a Dalton error as a ppm error at the given reference mass
pub fn dalton_to_ppm(error: Mass, reference: Mass) -> Ratio {
    Ratio::new::<part_per_million>(error.get::<dalton>() * 1e6 / reference.get::<dalton>())
}
