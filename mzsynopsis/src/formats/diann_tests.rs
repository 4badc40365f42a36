#![allow(clippy::missing_panics_doc, clippy::float_cmp)]
use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;
use uom::si::{mass::dalton, ratio::part_per_million};

use crate::{
    CleavageState, Column, ColumnMap, Diann, DiannColumn, EnzymaticTermini, ReadOptions,
    SynopsisFormat, ToleranceUnit, csv::CsvLine,
};

#[test]
fn diann_synopsis() {
    let psms = Diann::parse_reader(DIANN_SYNOPSIS.as_bytes(), ReadOptions::default())
        .unwrap()
        .collect_vec();
    assert_eq!(psms.len(), 5);
    assert_eq!(psms.iter().filter(|p| p.is_ok()).count(), 4);

    let first = psms[0].as_ref().unwrap();
    assert_eq!(first.result_id, 1);
    assert_eq!(first.scan, 3413);
    assert_eq!(first.charge, 2);
    assert_eq!(first.rank, 1);
    assert_eq!(first.peptide, "K.AEFVEVTK.L");
    assert_eq!(first.clean_sequence(), Some("AEFVEVTK"));
    assert_eq!(
        first.context.as_ref().map(|c| c.cleavage_state),
        Some(CleavageState::Full)
    );
    assert_eq!(first.proteins, ["SO_1126", "SO_3305"]);
    let mass = first.precursor_mass.unwrap().get::<dalton>();
    assert!((mass - 919.479_445_066_758).abs() < 1e-6);
    assert!((first.mass_error.get::<dalton>() - 0.0012).abs() < 1e-12);
    assert!((first.ppm_error.get::<part_per_million>() - 1.305).abs() < 1e-9);
    assert_eq!(first.scores.get("QValue"), Some("0.00010"));
    assert_eq!(first.scores.get("EValue"), Some("1.2E-05"));
    assert_eq!(first.scores.get("Dataset"), Some("QC_Shew_20_01"));
    assert_eq!(first.scores.len(), 17);
    assert_eq!(
        first.scores.iter().map(|(k, _)| k).take(3).collect_vec(),
        ["Dataset", "DatasetID", "DelM_DiaNN"]
    );

    let second = psms[1].as_ref().unwrap();
    assert_eq!(second.proteins, ["SO_2417"]);
    assert_eq!(second.precursor_mass, None);
    assert_eq!(
        second.context.as_ref().map(|c| c.cleavage_state),
        Some(CleavageState::Partial)
    );

    assert!(psms[2].is_err());

    let fourth = psms[3].as_ref().unwrap();
    assert_eq!(fourth.result_id, 0);
    assert_eq!(fourth.charge, 0);
    assert_eq!(fourth.rank, 0);
    assert!(fourth.proteins.is_empty());
    assert_eq!(fourth.mass_error.get::<dalton>(), 0.0);
}

#[test]
fn fast_read_defers_context() {
    let mut psms = Diann::parse_reader(DIANN_SYNOPSIS.as_bytes(), ReadOptions::fast())
        .unwrap()
        .filter_map(Result::ok)
        .collect_vec();
    assert_eq!(psms.len(), 4);
    assert!(psms.iter().all(|p| p.context.is_none()));
    assert_eq!(psms[0].peptide, "K.AEFVEVTK.L");
    assert_eq!(psms[0].finalize().cleavage_state, CleavageState::Full);
    assert_eq!(psms[0].clean_sequence(), Some("AEFVEVTK"));
}

#[test]
fn header_in_any_order_and_case() {
    let header = ["peptide", "SCAN", "  qvalue ", "Charge", "unrelated", "rank_evalue"];
    let columns = Diann::resolve_header(header);
    assert_eq!(columns.len(), 5);
    assert_eq!(columns.index(DiannColumn::Peptide), Some(0));
    assert_eq!(columns.index(DiannColumn::Scan), Some(1));
    assert_eq!(columns.index(DiannColumn::QValue), Some(2));
    assert_eq!(columns.index(DiannColumn::Charge), Some(3));
    assert_eq!(columns.index(DiannColumn::RankEValue), Some(5));
    assert_eq!(columns.index(DiannColumn::Protein), None);
    assert_eq!(columns, Diann::resolve_header(header));

    let all = DiannColumn::ALL.iter().rev().map(|c| c.header().to_uppercase());
    let columns = ColumnMap::<DiannColumn>::resolve(all);
    assert_eq!(columns.len(), DiannColumn::ALL.len());
    for (index, column) in DiannColumn::ALL.iter().rev().enumerate() {
        assert_eq!(columns.index(*column), Some(index));
    }
}

#[test]
fn canonical_headers_are_unique() {
    let headers = DiannColumn::schema().map(|(_, h)| h.to_lowercase()).collect_vec();
    assert_eq!(headers.len(), headers.iter().unique().count());
    assert_eq!(DiannColumn::RankEValue.header(), "Rank_EValue");
    assert_eq!(DiannColumn::DelMPPM.header(), "DelM_PPM");
    assert_eq!(
        DiannColumn::from_header("delm_diann"),
        Some(DiannColumn::DelMDiaNN)
    );
    assert_eq!(DiannColumn::from_header("Protein Group"), None);
}

#[test]
fn scan_is_required() {
    let columns = Diann::resolve_header(["ResultID", "Scan", "Peptide"]);
    let options = ReadOptions::default();
    let line = |text: &str| CsvLine::new(1, text.to_string(), b'\t');
    assert!(Diann::parse_line(&line("1\tabc\tK.PEPTIDE.R"), &columns, options).is_err());
    assert!(Diann::parse_line(&line("1\t\tK.PEPTIDE.R"), &columns, options).is_err());
    assert!(Diann::parse_line(&line("1"), &columns, options).is_err());
    assert_eq!(
        Diann::parse_line(&line("1\t 12 \tK.PEPTIDE.R"), &columns, options)
            .unwrap()
            .scan,
        12
    );

    let without_scan = Diann::resolve_header(["ResultID", "Peptide"]);
    assert!(Diann::parse_line(&line("1\tK.PEPTIDE.R"), &without_scan, options).is_err());
}

#[test]
fn additional_proteins_are_cleaned() {
    let columns = Diann::resolve_header(["Scan", "Protein", "AdditionalProteins"]);
    let psm = Diann::parse_line(
        &CsvLine::new(1, "5\t  \tP1;;P2 ; ".to_string(), b'\t'),
        &columns,
        ReadOptions::default(),
    )
    .unwrap();
    assert_eq!(psm.proteins, ["P1", "P2"]);
    assert_eq!(psm.protein(), Some("P1"));

    let psm = Diann::parse_line(
        &CsvLine::new(1, "5\tP0\tP1;P0".to_string(), b'\t'),
        &columns,
        ReadOptions::default(),
    )
    .unwrap();
    assert_eq!(psm.proteins, ["P0", "P1", "P0"]);
}

#[test]
fn short_lines_degrade() {
    let columns = Diann::resolve_header(["Scan", "Charge", "PrecursorMZ", "QValue"]);
    let psm = Diann::parse_line(
        &CsvLine::new(1, "7\t3".to_string(), b'\t'),
        &columns,
        ReadOptions::default(),
    )
    .unwrap();
    assert_eq!(psm.scan, 7);
    assert_eq!(psm.charge, 3);
    assert_eq!(psm.precursor_mass, None);
    assert!(psm.scores.is_empty());
}

#[test]
fn precursor_mass_needs_non_zero_mz() {
    let columns = Diann::resolve_header(["Scan", "Charge", "PrecursorMZ"]);
    let mass = |text: &str| {
        Diann::parse_line(
            &CsvLine::new(1, text.to_string(), b'\t'),
            &columns,
            ReadOptions::default(),
        )
        .unwrap()
        .precursor_mass
        .map(|m| m.get::<dalton>())
    };
    assert_eq!(mass("1\t2\t1e-20"), None);
    assert_eq!(mass("1\t2\t-1e-20"), None);
    assert_eq!(mass("1\t2\t0.0"), None);
    assert_eq!(mass("1\t0\t500.0"), None);
    let negative = mass("1\t2\t-500.0").unwrap();
    assert!((negative - -1002.014_552_933_242).abs() < 1e-9);
    let positive = mass("1\t2\t500.0").unwrap();
    assert!((positive - 997.985_447_066_758).abs() < 1e-9);
}

#[test]
fn peptide_is_trimmed_in_both_modes() {
    let columns = Diann::resolve_header(["Scan", "Peptide"]);
    let line = CsvLine::new(1, "1\t K.PEPTIDEK.A ".to_string(), b'\t');
    let fast = Diann::parse_line(&line, &columns, ReadOptions::fast()).unwrap();
    let full = Diann::parse_line(&line, &columns, ReadOptions::default()).unwrap();
    assert_eq!(fast.peptide, "K.PEPTIDEK.A");
    assert_eq!(fast.peptide, full.peptide);
    assert_eq!(fast.context, None);
    assert_eq!(
        full.context.as_ref().map(|c| c.cleavage_state),
        Some(CleavageState::Full)
    );
}

#[test]
fn columns_serialize_as_headers() {
    for column in DiannColumn::ALL {
        let text = serde_json::to_string(column).unwrap();
        assert_eq!(text, format!("\"{}\"", column.header()));
        assert_eq!(serde_json::from_str::<DiannColumn>(&text).unwrap(), *column);
    }
    assert_eq!(
        serde_json::to_string(&DiannColumn::DelMDiaNN).unwrap(),
        "\"DelM_DiaNN\""
    );
}

fn parameters(text: &str) -> IndexMap<String, String> {
    crate::parse_key_value_parameters(text.as_bytes()).unwrap()
}

#[test]
fn parameters_with_known_enzyme() {
    let (parameters, warnings) = Diann::interpret_parameters(parameters(DIANN_PARAMETERS), None);
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(parameters.search_engine, "DIA-NN");
    assert_eq!(parameters.enzyme, "trypsin");
    assert_eq!(
        parameters.enzymatic_termini,
        Some(EnzymaticTermini::FullySpecific)
    );
    assert_eq!(parameters.precursor_tolerance.unit, ToleranceUnit::Ppm);
    assert!((parameters.precursor_tolerance.ppm() - 20.0).abs() < 1e-9);
    assert!((parameters.precursor_tolerance.dalton() - 0.04).abs() < 1e-12);
    assert_eq!(parameters.get("num_threads"), Some("8"));
}

#[test]
fn parameters_with_unknown_enzyme() {
    let text = DIANN_PARAMETERS.replace("= trypsin", "= bogus_enzyme");
    let (parameters, warnings) = Diann::interpret_parameters(parameters(&text), None);
    assert_eq!(parameters.enzyme, "bogus_enzyme");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn parameters_with_legacy_enzyme_name() {
    let (parameters, warnings) = Diann::interpret_parameters(
        parameters(
            "search_enzyme_name = stricttrypsin\nnum_enzyme_termini = 1\nprecursor_true_tolerance = 10\nprecursor_true_units = 0\n",
        ),
        None,
    );
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(parameters.enzyme, "stricttrypsin");
    assert_eq!(
        parameters.enzymatic_termini,
        Some(EnzymaticTermini::SemiSpecific)
    );
    assert_eq!(parameters.precursor_tolerance.unit, ToleranceUnit::Dalton);
    assert!((parameters.precursor_tolerance.dalton() - 10.0).abs() < 1e-9);
    assert!((parameters.precursor_tolerance.ppm() - 10_000.0).abs() < 1e-6);
}

#[test]
fn parameters_with_blank_enzyme_name() {
    let (parameters, warnings) = Diann::interpret_parameters(
        parameters(
            "search_enzyme_name_1 =\nsearch_enzyme_name = lysc\nnum_enzyme_termini = 2\nprecursor_true_tolerance = 10\nprecursor_true_units = 1\n",
        ),
        None,
    );
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(parameters.enzyme, "lysc");
    assert_eq!(parameters.get("search_enzyme_name_1"), Some(""));
}

#[test]
fn unit_warning_names_the_parameter_file() {
    let text = DIANN_PARAMETERS.replace("precursor_mass_units = 1", "precursor_mass_units = 5");
    let path = Path::new("QC_Shew_20_01_diann.params");
    let (interpreted, warnings) = Diann::interpret_parameters(parameters(&text), Some(path));
    assert_eq!(interpreted.precursor_tolerance.unit, ToleranceUnit::Dalton);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().contains("QC_Shew_20_01_diann.params"));

    let text = DIANN_PARAMETERS.replace("= trypsin", "= bogus_enzyme");
    let (_, warnings) = Diann::interpret_parameters(parameters(&text), Some(path));
    assert!(warnings[0].to_string().contains("QC_Shew_20_01_diann.params"));
}

#[test]
fn parameters_missing_everything() {
    let (parameters, warnings) =
        Diann::interpret_parameters(parameters("num_enzyme_termini = 4\n"), None);
    assert_eq!(parameters.enzyme, "");
    assert_eq!(parameters.enzymatic_termini, None);
    assert_eq!(parameters.precursor_tolerance.dalton(), 0.0);
    assert_eq!(parameters.precursor_tolerance.ppm(), 0.0);
    assert_eq!(warnings.len(), 3);
}

#[test]
fn parameters_are_deterministic() {
    let first = Diann::interpret_parameters(parameters(DIANN_PARAMETERS), None).0;
    let second = Diann::interpret_parameters(parameters(DIANN_PARAMETERS), None).0;
    assert_eq!(first, second);
}

#[test]
fn file_names() {
    assert_eq!(
        Diann::synopsis_file_name("QC_Shew_20_01"),
        "QC_Shew_20_01_diann_syn.txt"
    );
    assert_eq!(
        Diann::first_hits_file_name("QC_Shew_20_01"),
        "QC_Shew_20_01_diann_fht.txt"
    );
}

const DIANN_PARAMETERS: &str = "# DIA-NN search settings
num_threads = 8
search_enzyme_name_1 = trypsin
search_enzyme_name = lysc
num_enzyme_termini = 2
precursor_mass_lower = -20
precursor_mass_upper = 20
precursor_mass_units = 1
precursor_true_tolerance = 20
precursor_true_units = 1
";

const DIANN_SYNOPSIS: &str = "ResultID\tDataset\tDatasetID\tScan\tCharge\tPrecursorMZ\tDelM\tDelM_PPM\tDelM_DiaNN\tMH\tMass\tPeptide\tModifications\tProtein\tAdditionalProteins\tNTT\tEValue\tRank_EValue\tHyperscore\tNextscore\tPeptideProphetProbability\tElutionTime\tElutionTimeAverage\tMissedCleavages\tNumberOfMatchedIons\tTotalNumberOfIons\tQValue
1\tQC_Shew_20_01\t912345\t3413\t2\t460.746999\t0.0012\t1.305\t0.0011\t920.4867\t919.4794\tK.AEFVEVTK.L\t\tSO_1126\tSO_3305\t2\t1.2E-05\t1\t32.5\t20.1\t0.998\t25.31\t25.30\t0\t12\t14\t0.00010
2\tQC_Shew_20_01\t912345\t3520\t3\t0\t-0.0005\t-0.41\t-0.0004\t1200.6412\t1199.6339\t-.MSLLTEVETPIR.P\tM1:Oxidation\tSO_2417\t\t1\t3.4E-03\t1\t21.7\t19.9\t0.75\t27.02\t27.02\t0\t9\t22\t0.0120
3\tQC_Shew_20_01\t912345\tnot_a_scan\t2\t500.0\t0\t0\t0\t999.0\t998.0\tR.LVSTEEK.A\t\tSO_0001\t\t2\t0.5\t1\t10\t9\t0.1\t30.0\t30.0\t0\t3\t12\t0.5
\tQC_Shew_20_01\t912345\t3601\tx\t\t\t\t\t\t\tR.GAEVIR.Q\t\t\t\t2\t0.9\t\t5\t4\t0.05\t31.0\t31.0\t0\t2\t10\t0.9
5\tQC_Shew_20_01\t912345\t3700\t2\t600.30\t0.001\t0.8\t0.001\t1199.59\t1198.58\tK.VLDGFDR.-\t\tSO_4000\tSO_4001;SO_4002\t2\t1E-4\t2\t15\t12\t0.9\t33.1\t33.1\t0\t8\t12\t0.003
";
