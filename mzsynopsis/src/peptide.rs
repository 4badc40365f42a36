use serde::{Deserialize, Serialize};

use crate::helper_functions::strip_enclosed;

/// How well both termini of a peptide fit the cleavage rule of the enzyme
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum CleavageState {
    /// The flanking residues are not known
    #[default]
    Unknown,
    /// Neither terminus is the result of enzymatic cleavage
    NonSpecific,
    /// One terminus is the result of enzymatic cleavage
    Partial,
    /// Both termini are the result of enzymatic cleavage
    Full,
}

impl CleavageState {
    /// The number of enzymatic termini (NTT), `None` if unknown
    pub const fn enzymatic_termini(self) -> Option<u8> {
        match self {
            Self::Unknown => None,
            Self::NonSpecific => Some(0),
            Self::Partial => Some(1),
            Self::Full => Some(2),
        }
    }
}

/// A peptide split into its flanking residues and bare sequence, together with the cleavage state
/// derived from it with the trypsin rule (cleave after K or R unless followed by P). The protein
/// termini (`-`) always count as enzymatic.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PeptideContext {
    /// The residue before the peptide, `-` for the protein N-terminus
    pub prefix: Option<char>,
    /// The amino acid sequence without modifications
    pub sequence: String,
    /// The residue after the peptide, `-` for the protein C-terminus
    pub suffix: Option<char>,
    /// The cleavage state
    pub cleavage_state: CleavageState,
    /// The number of internal sites where the enzyme could have cleaved
    pub missed_cleavages: usize,
}

impl PeptideContext {
    /// Parse a peptide as written in synopsis files, either `K.PEPT(UniMod:21)IDER.A` or without
    /// the flanking residues `PEPT(UniMod:21)IDER`.
    pub fn parse(peptide: &str) -> Self {
        let peptide = peptide.trim();
        let (prefix, middle, suffix) = match peptide.split_once('.').zip(peptide.rsplit_once('.'))
        {
            Some(((pre, rest), (_, post)))
                if pre.chars().count() == 1
                    && post.chars().count() == 1
                    && rest.len() > post.len() =>
            {
                (
                    pre.chars().next(),
                    &rest[..rest.len() - post.len() - 1],
                    post.chars().next(),
                )
            }
            _ => (None, peptide, None),
        };
        let sequence: String = strip_enclosed(middle, &['(', '['], &[')', ']'])
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let n_terminal = prefix.map(|p| {
            p == '-' || sequence.chars().next().is_some_and(|first| cleaves(p, first))
        });
        let c_terminal = suffix.map(|s| {
            s == '-' || sequence.chars().last().is_some_and(|last| cleaves(last, s))
        });
        let cleavage_state = match (n_terminal, c_terminal) {
            (None, None) => CleavageState::Unknown,
            (Some(true), Some(true)) => CleavageState::Full,
            (Some(true), _) | (_, Some(true)) => CleavageState::Partial,
            _ => CleavageState::NonSpecific,
        };
        let missed_cleavages = sequence
            .as_bytes()
            .windows(2)
            .filter(|pair| cleaves(char::from(pair[0]), char::from(pair[1])))
            .count();

        Self {
            prefix,
            sequence,
            suffix,
            cleavage_state,
            missed_cleavages,
        }
    }
}

/// Trypsin cleaves after K or R, but not before P
fn cleaves(before: char, after: char) -> bool {
    matches!(before.to_ascii_uppercase(), 'K' | 'R') && !after.eq_ignore_ascii_case(&'P')
}
