//! Convert a DIA-NN synopsis file into a plain CSV file

use std::{fs::File, io::BufWriter, process::ExitCode};

use clap::Parser;
use mzsynopsis::{Diann, PSM, ReadOptions, SynopsisFormat, csv::write_csv};
use uom::si::{mass::dalton, ratio::part_per_million};

/// The command line interface arguments
#[derive(Debug, Parser)]
struct Cli {
    /// The input synopsis file, can be gzipped
    #[arg(short, long)]
    in_path: String,
    /// The parameter file of the search, if given the interpreted parameters are shown
    #[arg(short, long)]
    parameters: Option<String>,
    /// The output path to output the resulting csv file
    #[arg(short, long)]
    out_path: String,
    /// Skip the cleavage state calculation
    #[arg(long)]
    fast: bool,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(path) = &args.parameters {
        match Diann::read_parameters(path) {
            Ok((parameters, parameter_warnings)) => {
                warnings.extend(parameter_warnings);
                match serde_json::to_string_pretty(&parameters) {
                    Ok(text) => println!("{text}"),
                    Err(error) => println!("Could not show the parameters: {error}"),
                }
                println!("Precursor tolerance: {}", parameters.precursor_tolerance);
            }
            Err(error) => {
                println!("{error}");
                return ExitCode::FAILURE;
            }
        }
    }

    let options = if args.fast {
        ReadOptions::fast()
    } else {
        ReadOptions::default()
    };
    let psms = match Diann::parse_file(&args.in_path, options) {
        Ok(psms) => psms,
        Err(error) => {
            println!("{error}");
            return ExitCode::FAILURE;
        }
    };
    let mut rows = Vec::new();
    for psm in psms {
        match psm {
            Ok(psm) => rows.push(row(psm)),
            Err(error) => context_error::combine_error(&mut errors, error, ()),
        }
    }

    let written = File::create(&args.out_path)
        .and_then(|file| write_csv(BufWriter::new(file), rows, ','));
    if let Err(error) = written {
        println!("Could not write '{}': {error}", args.out_path);
        return ExitCode::FAILURE;
    }

    for e in &errors {
        println!("{e}");
    }
    for e in &warnings {
        println!("{e}");
    }
    if errors.is_empty() {
        println!("No errors, enjoy the new file!");
    } else {
        println!(
            "Errors were found while parsing the synopsis file. Output is still generated but all above lines are ignored."
        );
    }
    ExitCode::SUCCESS
}

/// Flatten a PSM into named columns, the auxiliary scores follow the fixed columns
fn row(mut psm: PSM) -> Vec<(String, String)> {
    let context = psm.finalize().clone();
    let mut row = vec![
        ("result_id".to_string(), psm.result_id.to_string()),
        ("scan".to_string(), psm.scan.to_string()),
        ("z".to_string(), psm.charge.to_string()),
        ("peptide".to_string(), psm.peptide.clone()),
        ("sequence".to_string(), context.sequence),
        (
            "prefix".to_string(),
            context.prefix.map(String::from).unwrap_or_default(),
        ),
        (
            "suffix".to_string(),
            context.suffix.map(String::from).unwrap_or_default(),
        ),
        (
            "ntt".to_string(),
            context
                .cleavage_state
                .enzymatic_termini()
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ),
        (
            "missed_cleavages".to_string(),
            context.missed_cleavages.to_string(),
        ),
        (
            "protein".to_string(),
            psm.protein().unwrap_or_default().to_string(),
        ),
        (
            "additional_proteins".to_string(),
            psm.additional_proteins().join(";"),
        ),
        (
            "precursor_mass".to_string(),
            psm.precursor_mass
                .map(|m| m.get::<dalton>().to_string())
                .unwrap_or_default(),
        ),
        ("mass_error".to_string(), psm.mass_error.get::<dalton>().to_string()),
        (
            "ppm_error".to_string(),
            psm.ppm_error.get::<part_per_million>().to_string(),
        ),
        ("rank".to_string(), psm.rank.to_string()),
    ];
    row.extend(
        psm.scores
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );
    row
}
