use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Mass, Ratio},
    mass::dalton,
    ratio::part_per_million,
};

use crate::PeptideContext;

/// The settings used when reading a synopsis file
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct ReadOptions {
    /// Skip the cleavage state calculation while reading, the peptide is stored as is and
    /// [`PSM::finalize`] has to be called later to get the [`PeptideContext`].
    pub fast_read: bool,
}

impl ReadOptions {
    /// Options for fast reading
    pub const fn fast() -> Self {
        Self { fast_read: true }
    }
}

/// One peptide-spectrum match as read from a single line of a synopsis file
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PSM {
    /// The result identifier, 0 if missing
    pub result_id: i32,
    /// The scan number
    pub scan: i32,
    /// The precursor charge, 0 if missing
    pub charge: i16,
    /// The peptide as written in the file with surrounding whitespace trimmed, including the
    /// flanking residues and modifications if present. This is stored the same way in fast mode.
    pub peptide: String,
    /// The flanking residues and cleavage state, `None` if read in fast mode and not finalized
    pub context: Option<PeptideContext>,
    /// All proteins, the primary protein first, not deduplicated
    pub proteins: Vec<String>,
    /// The neutral precursor mass, only present if the precursor m/z was given and not zero
    pub precursor_mass: Option<Mass>,
    /// The precursor mass error in Dalton
    pub mass_error: Mass,
    /// The precursor mass error in ppm
    pub ppm_error: Ratio,
    /// The rank of this match for this spectrum, 0 if missing
    pub rank: i32,
    /// All other columns, as raw text and keyed by their canonical header
    pub scores: AuxiliaryScores,
}

impl Default for PSM {
    fn default() -> Self {
        Self {
            result_id: 0,
            scan: 0,
            charge: 0,
            peptide: String::new(),
            context: None,
            proteins: Vec::new(),
            precursor_mass: None,
            mass_error: Mass::new::<dalton>(0.0),
            ppm_error: Ratio::new::<part_per_million>(0.0),
            rank: 0,
            scores: AuxiliaryScores::default(),
        }
    }
}

impl PSM {
    /// The primary protein
    pub fn protein(&self) -> Option<&str> {
        self.proteins.first().map(String::as_str)
    }

    /// All proteins except the primary protein
    pub fn additional_proteins(&self) -> &[String] {
        self.proteins.get(1..).unwrap_or_default()
    }

    /// Calculate the [`PeptideContext`] if this was not yet done (because the PSM was read in fast
    /// mode). Calling this multiple times has no additional effect.
    pub fn finalize(&mut self) -> &PeptideContext {
        self.context
            .get_or_insert_with(|| PeptideContext::parse(&self.peptide))
    }

    /// The amino acid sequence without flanking residues or modifications, only available if the
    /// context is known
    pub fn clean_sequence(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.sequence.as_str())
    }
}

/// The columns that have no dedicated place in a [`PSM`], stored as the original text so no
/// precision is lost. The order is the order in which the columns were added.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuxiliaryScores(IndexMap<String, String>);

impl AuxiliaryScores {
    /// Add a value, overwriting any previous value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get the raw text for a column, the name is matched ignoring case
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str).or_else(|| {
            self.0
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }

    /// Parse the text for a column, `None` if absent or not parsable
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| value.trim().parse().ok())
    }

    /// Check if a column is stored
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The number of stored columns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no stored columns
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all columns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a AuxiliaryScores {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
