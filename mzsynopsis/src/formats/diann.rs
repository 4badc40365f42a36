use std::path::Path;

use context_error::{BasicKind, BoxedError, Context, CreateError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Mass, Ratio},
    mass::dalton,
    ratio::part_per_million,
};

use crate::{
    Column, ColumnMap, EnzymaticTermini, PSM, PeptideContext, PrecursorTolerance, ReadOptions,
    SearchEngineParameters, SynopsisFormat, ToleranceWindow,
    csv::CsvLine,
    helper_functions::explain_number_error,
    mass::neutral_mass_from_mz,
    read_key_value_parameters,
};

/// All columns of a DIA-NN synopsis file
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum DiannColumn {
    /// `ResultID`
    ResultID,
    /// `Dataset`
    Dataset,
    /// `DatasetID`
    DatasetID,
    /// `Scan`, the only column that is required to read a line
    Scan,
    /// `Charge`
    Charge,
    /// `PrecursorMZ`
    PrecursorMZ,
    /// `DelM`, the precursor mass error in Dalton
    DelM,
    /// `DelM_PPM`, the precursor mass error in ppm
    #[serde(rename = "DelM_PPM")]
    DelMPPM,
    /// `DelM_DiaNN`, the mass error as reported by DIA-NN itself
    #[serde(rename = "DelM_DiaNN")]
    DelMDiaNN,
    /// `MH`
    MH,
    /// `Mass`
    Mass,
    /// `Peptide`
    Peptide,
    /// `Modifications`
    Modifications,
    /// `Protein`
    Protein,
    /// `AdditionalProteins`, separated by `;`
    AdditionalProteins,
    /// `NTT`
    NTT,
    /// `EValue`
    EValue,
    /// `Rank_EValue`
    #[serde(rename = "Rank_EValue")]
    RankEValue,
    /// `Hyperscore`
    Hyperscore,
    /// `Nextscore`
    Nextscore,
    /// `PeptideProphetProbability`
    PeptideProphetProbability,
    /// `ElutionTime`
    ElutionTime,
    /// `ElutionTimeAverage`
    ElutionTimeAverage,
    /// `MissedCleavages`
    MissedCleavages,
    /// `NumberOfMatchedIons`
    NumberOfMatchedIons,
    /// `TotalNumberOfIons`
    TotalNumberOfIons,
    /// `QValue`
    QValue,
}

impl Column for DiannColumn {
    const ALL: &'static [Self] = &[
        Self::ResultID,
        Self::Dataset,
        Self::DatasetID,
        Self::Scan,
        Self::Charge,
        Self::PrecursorMZ,
        Self::DelM,
        Self::DelMPPM,
        Self::DelMDiaNN,
        Self::MH,
        Self::Mass,
        Self::Peptide,
        Self::Modifications,
        Self::Protein,
        Self::AdditionalProteins,
        Self::NTT,
        Self::EValue,
        Self::RankEValue,
        Self::Hyperscore,
        Self::Nextscore,
        Self::PeptideProphetProbability,
        Self::ElutionTime,
        Self::ElutionTimeAverage,
        Self::MissedCleavages,
        Self::NumberOfMatchedIons,
        Self::TotalNumberOfIons,
        Self::QValue,
    ];

    fn header(self) -> &'static str {
        match self {
            Self::ResultID => "ResultID",
            Self::Dataset => "Dataset",
            Self::DatasetID => "DatasetID",
            Self::Scan => "Scan",
            Self::Charge => "Charge",
            Self::PrecursorMZ => "PrecursorMZ",
            Self::DelM => "DelM",
            Self::DelMPPM => "DelM_PPM",
            Self::DelMDiaNN => "DelM_DiaNN",
            Self::MH => "MH",
            Self::Mass => "Mass",
            Self::Peptide => "Peptide",
            Self::Modifications => "Modifications",
            Self::Protein => "Protein",
            Self::AdditionalProteins => "AdditionalProteins",
            Self::NTT => "NTT",
            Self::EValue => "EValue",
            Self::RankEValue => "Rank_EValue",
            Self::Hyperscore => "Hyperscore",
            Self::Nextscore => "Nextscore",
            Self::PeptideProphetProbability => "PeptideProphetProbability",
            Self::ElutionTime => "ElutionTime",
            Self::ElutionTimeAverage => "ElutionTimeAverage",
            Self::MissedCleavages => "MissedCleavages",
            Self::NumberOfMatchedIons => "NumberOfMatchedIons",
            Self::TotalNumberOfIons => "TotalNumberOfIons",
            Self::QValue => "QValue",
        }
    }
}

impl std::fmt::Display for DiannColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// The columns that are kept as raw text in [`PSM::scores`]
const AUXILIARY_COLUMNS: [DiannColumn; 17] = [
    DiannColumn::Dataset,
    DiannColumn::DatasetID,
    DiannColumn::DelMDiaNN,
    DiannColumn::MH,
    DiannColumn::Mass,
    DiannColumn::Modifications,
    DiannColumn::NTT,
    DiannColumn::EValue,
    DiannColumn::Hyperscore,
    DiannColumn::Nextscore,
    DiannColumn::PeptideProphetProbability,
    DiannColumn::ElutionTime,
    DiannColumn::ElutionTimeAverage,
    DiannColumn::MissedCleavages,
    DiannColumn::NumberOfMatchedIons,
    DiannColumn::TotalNumberOfIons,
    DiannColumn::QValue,
];

/// All enzyme names that are recognised in the parameter file (case sensitive)
pub const KNOWN_ENZYMES: &[&str] = &[
    "argc",
    "aspn",
    "chymotrypsin",
    "clostripain",
    "cnbr",
    "elastase",
    "formicacid",
    "gluc",
    "gluc_bicarb",
    "lysc",
    "lysc-p",
    "lysn",
    "lysn_promisc",
    "no_enzyme",
    "nonspecific",
    "null",
    "stricttrypsin",
    "trypsin",
    "trypsin/chymotrypsin",
    "trypsin/cnbr",
    "trypsin_gluc",
];

/// The DIA-NN synopsis file format
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Diann;

impl Diann {
    /// The name of the synopsis file for the given dataset
    pub fn synopsis_file_name(dataset: &str) -> String {
        format!("{dataset}_diann_syn.txt")
    }

    /// The name of the first hits file for the given dataset
    pub fn first_hits_file_name(dataset: &str) -> String {
        format!("{dataset}_diann_fht.txt")
    }

    /// Interpret the raw parameters of a DIA-NN search. This never fails, anything that cannot be
    /// determined is left at its default and reported as a warning.
    ///  * The enzyme is read from `search_enzyme_name_1`, or the older `search_enzyme_name`.
    ///  * The number of enzymatic termini is read from `num_enzyme_termini`.
    ///  * The precursor tolerance, see [`ToleranceWindow::resolve`].
    pub fn interpret_parameters(
        parameters: IndexMap<String, String>,
        source: Option<&Path>,
    ) -> (SearchEngineParameters, Vec<BoxedError<'static, BasicKind>>) {
        let mut warnings = Vec::new();
        let context = || {
            source.map_or_else(Context::none, |path| {
                Context::none().source(path.to_string_lossy().to_string())
            })
        };

        let enzyme = ["search_enzyme_name_1", "search_enzyme_name"]
            .iter()
            .find_map(|key| {
                parameters
                    .get(*key)
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
            })
            .map(ToString::to_string);
        match &enzyme {
            None => warnings.push(BoxedError::new(
                BasicKind::Warning,
                "Missing enzyme",
                "Neither 'search_enzyme_name_1' nor 'search_enzyme_name' is defined, the enzyme is left empty",
                context(),
            )),
            Some(name) if !KNOWN_ENZYMES.contains(&name.as_str()) => {
                warnings.push(BoxedError::new(
                    BasicKind::Warning,
                    "Unknown enzyme",
                    format!("The enzyme '{name}' is not a known enzyme, it is used as is"),
                    context(),
                ));
            }
            Some(_) => (),
        }

        let enzymatic_termini = match parameters.get("num_enzyme_termini") {
            None => {
                warnings.push(BoxedError::new(
                    BasicKind::Warning,
                    "Missing enzymatic termini",
                    "The parameter 'num_enzyme_termini' is not defined, the number of enzymatic termini is left unresolved",
                    context(),
                ));
                None
            }
            Some(value) => {
                let termini = EnzymaticTermini::from_parameter(value);
                if termini.is_none() {
                    warnings.push(BoxedError::new(
                        BasicKind::Warning,
                        "Invalid enzymatic termini",
                        format!(
                            "The value '{value}' for 'num_enzyme_termini' is not 0, 1, or 2, the number of enzymatic termini is left unresolved"
                        ),
                        context(),
                    ));
                }
                termini
            }
        };

        let precursor_tolerance = ToleranceWindow::resolve(&parameters, &context(), &mut warnings)
            .map_or_else(
                || {
                    warnings.push(BoxedError::new(
                        BasicKind::Warning,
                        "Missing precursor tolerance",
                        "The precursor tolerance is not defined by 'precursor_mass_lower', 'precursor_mass_upper', and 'precursor_mass_units' nor by 'precursor_true_tolerance' and 'precursor_true_units', the tolerance is set to zero",
                        context(),
                    ));
                    PrecursorTolerance::default()
                },
                |window| window.precursor_tolerance(),
            );

        (
            SearchEngineParameters {
                search_engine: Self::NAME.to_string(),
                source: source.map(Path::to_path_buf),
                parameters,
                enzyme: enzyme.unwrap_or_default(),
                enzymatic_termini,
                precursor_tolerance,
            },
            warnings,
        )
    }

    /// Read the scan number, the only value that has to be present and valid
    fn scan(
        line: &CsvLine,
        columns: &ColumnMap<DiannColumn>,
    ) -> Result<i32, BoxedError<'static, BasicKind>> {
        let index = columns.index(DiannColumn::Scan).ok_or_else(|| {
            BoxedError::new(
                BasicKind::Error,
                "Missing scan column",
                "The header of this file does not contain the 'Scan' column so no line can be read",
                line.full_context().to_owned(),
            )
        })?;
        let text = line.get(index).ok_or_else(|| {
            BoxedError::new(
                BasicKind::Error,
                "Missing scan number",
                format!(
                    "This line has {} columns, so the scan number (column {}) is missing",
                    line.number_of_columns(),
                    index + 1
                ),
                line.full_context().to_owned(),
            )
        })?;
        text.trim().parse::<i32>().map_err(|err| {
            BoxedError::new(
                BasicKind::Error,
                "Invalid scan number",
                format!("The scan number {}", explain_number_error(&err)),
                line.column_context(index).to_owned(),
            )
        })
    }
}

impl SynopsisFormat for Diann {
    type Column = DiannColumn;
    const NAME: &'static str = "DIA-NN";

    fn parse_line(
        line: &CsvLine,
        columns: &ColumnMap<DiannColumn>,
        options: ReadOptions,
    ) -> Result<PSM, BoxedError<'static, BasicKind>> {
        let scan = Self::scan(line, columns)?;
        let peptide = columns
            .value(line, DiannColumn::Peptide)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let charge = columns.parse_or_default(line, DiannColumn::Charge);

        let mut proteins = Vec::new();
        if let Some(protein) = columns
            .value(line, DiannColumn::Protein)
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            proteins.push(protein.to_string());
        }
        if let Some(additional) = columns.value(line, DiannColumn::AdditionalProteins) {
            proteins.extend(
                additional
                    .split(';')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(ToString::to_string),
            );
        }

        let mz: f64 = columns.parse_or_default(line, DiannColumn::PrecursorMZ);
        let precursor_mass = if mz.abs() > f64::EPSILON {
            neutral_mass_from_mz(mz, charge)
        } else {
            None
        };

        let mut psm = PSM {
            result_id: columns.parse_or_default(line, DiannColumn::ResultID),
            scan,
            charge,
            context: (!options.fast_read).then(|| PeptideContext::parse(&peptide)),
            peptide,
            proteins,
            precursor_mass,
            mass_error: Mass::new::<dalton>(columns.parse_or_default(line, DiannColumn::DelM)),
            ppm_error: Ratio::new::<part_per_million>(
                columns.parse_or_default(line, DiannColumn::DelMPPM),
            ),
            rank: columns.parse_or_default(line, DiannColumn::RankEValue),
            ..PSM::default()
        };

        for column in AUXILIARY_COLUMNS {
            if let Some(value) = columns.value(line, column) {
                psm.scores.insert(column.header(), value);
            }
        }

        Ok(psm)
    }

    fn read_parameters(
        path: impl AsRef<Path>,
    ) -> Result<
        (SearchEngineParameters, Vec<BoxedError<'static, BasicKind>>),
        BoxedError<'static, BasicKind>,
    > {
        let path = path.as_ref();
        read_key_value_parameters(path)
            .map(|parameters| Self::interpret_parameters(parameters, Some(path)))
    }
}
