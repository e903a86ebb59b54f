/*
This code is part of the parcel overlap detection tools.
Created: 10/10/2026
Last Modified: 15/10/2026
License: MIT
*/

use env_logger::Env;
use overlap_common::configs::{self, ConfigError, Configs};
use overlap_common::utils::get_formatted_elapsed_time;
use parcel_overlap::{run_batch, OverlapError};
use std::env;
use std::path;
use std::process;
use std::time::Instant;

/// Reads a tab-delimited file of parcel boundaries (WKT, parcel id, check
/// flag), finds every pair of parcels whose shapes overlap by more than the
/// similarity threshold, and writes them to a `;`-delimited report. Records
/// that cannot be parsed or are not valid polygons, and pairs whose overlap
/// cannot be computed, are written to the diagnostics file and skipped.
///
/// The similarity of two parcels is the area of their intersection divided
/// by the area of their union. Parcels with byte-identical boundaries are
/// duplicates of one another and are not reported as overlapping unless
/// `--report_duplicates` is given.
fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() <= 1 || args[1].trim() == "help" {
        help();
        return;
    }

    match args[1].trim() {
        "run" => {
            if let Err(e) = run(&args) {
                eprintln!("Error: {}", e);
                process::exit(e.exit_code());
            }
        }
        "version" => version(),
        other => {
            eprintln!("Unrecognized command '{}'.", other);
            help();
            process::exit(1);
        }
    }
}

fn help() {
    let mut ext = "";
    if cfg!(target_os = "windows") {
        ext = ".exe";
    }

    let exe_name = &format!("parcel_overlap{}", ext);
    let sep: String = path::MAIN_SEPARATOR.to_string();
    let s = r#"
    parcel_overlap Help

    Finds pairs of land-parcel boundaries that overlap by more than a similarity threshold.

    The following commands are recognized:
    help       Prints help information.
    run        Runs the overlap check.
    version    Prints the tool version information.

    The following flags can be used with the 'run' command:
    -i, --input          Name of the input boundary file (WKT, id, check flag).
    -o, --output         Name of the output overlap report.
    -e, --errors         Name of the output diagnostics file.
    --threshold          Similarity above which a pair is reported; default 0.05.
    --delimiter          Field separator of the input file; default is a tab.
    --max_procs          Number of worker threads; -1 uses all cores.
    --check_flag_only    Only check boundaries whose check flag is TRUE.
    --report_duplicates  Report parcels with byte-identical boundary text as overlaps.
    --wd                 Working directory used to resolve file names.
    --save_settings      Stores the settings of this run in settings.json.
    -v, --verbose        Prints progress and a run summary.

    Unspecified settings are read from the settings.json file in the current directory.

    Example Usage:
    >> .*EXE_NAME run -i=ops_ready_boundaries.tsv -o=overlaps.txt -e=errors.txt --threshold=0.05 -v
    "#
    .replace("*", &sep)
    .replace("EXE_NAME", exe_name);
    println!("{}", s);
}

fn version() {
    const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
    println!(
        "parcel_overlap v{}",
        VERSION.unwrap_or("Unknown version")
    );
}

fn get_tool_name() -> String {
    String::from("ParcelOverlap")
}

fn invalid(msg: String) -> OverlapError {
    OverlapError::Config(ConfigError::Invalid(msg))
}

fn run(args: &[String]) -> Result<(), OverlapError> {
    let tool_name = get_tool_name();
    let mut configs: Configs = configs::get_configs()?;
    let mut save_settings = false;

    // read the arguments
    for i in 2..args.len() {
        let mut arg = args[i].replace("\"", "");
        arg = arg.replace("\'", "");
        let cmd = arg.split("="); // in case an equals sign was used
        let vec = cmd.collect::<Vec<&str>>();
        let keyval = vec.len() > 1;
        let flag_val = vec[0].to_lowercase().replace("--", "-");
        let value = || -> Result<String, OverlapError> {
            if keyval {
                Ok(vec[1].to_string())
            } else {
                args.get(i + 1)
                    .cloned()
                    .ok_or_else(|| invalid(format!("missing value for {}", vec[0])))
            }
        };
        if flag_val == "-i" || flag_val == "-input" {
            configs.input_file = value()?;
        } else if flag_val == "-o" || flag_val == "-output" {
            configs.output_file = value()?;
        } else if flag_val == "-e" || flag_val == "-errors" {
            configs.error_file = value()?;
        } else if flag_val == "-threshold" {
            let v = value()?;
            configs.similarity_threshold = v
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("threshold '{}' is not a number", v)))?;
        } else if flag_val == "-delimiter" {
            let v = value()?;
            configs.delimiter = match v.as_str() {
                "\\t" | "tab" => '\t',
                _ => {
                    let mut chars = v.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => c,
                        _ => return Err(invalid(format!("delimiter '{}' is not one character", v))),
                    }
                }
            };
        } else if flag_val == "-max_procs" {
            let v = value()?;
            configs.max_procs = v
                .trim()
                .parse::<isize>()
                .map_err(|_| invalid(format!("max_procs '{}' is not an integer", v)))?;
        } else if flag_val == "-check_flag_only" {
            configs.enforce_check_flag = true;
        } else if flag_val == "-report_duplicates" {
            configs.report_duplicate_boundaries = true;
        } else if flag_val == "-wd" {
            configs.working_directory = value()?;
        } else if flag_val == "-save_settings" {
            save_settings = true;
        } else if flag_val == "-v" || flag_val == "-verbose" {
            configs.verbose_mode = true;
        }
    }

    let default_level = if configs.verbose_mode { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if configs.verbose_mode {
        let welcome_len = format!("* Welcome to {} *", tool_name).len().max(28);
        println!("{}", "*".repeat(welcome_len));
        println!(
            "* Welcome to {} {}*",
            tool_name,
            " ".repeat(welcome_len - 15 - tool_name.len())
        );
        println!("* Parcel overlap detection {}*", " ".repeat(welcome_len - 28));
        println!("{}", "*".repeat(welcome_len));
    }

    if save_settings {
        configs.validate()?;
        configs::save_configs(&configs)?;
    }

    let start = Instant::now();
    let summary = run_batch(&configs)?;
    let elapsed_time = get_formatted_elapsed_time(start);

    if configs.verbose_mode {
        println!("{}", summary);
        println!("{}", &format!("Elapsed Time: {}", elapsed_time));
    } else {
        println!(
            "Done processing boundaries. Total {} To check {}",
            summary.validated, summary.checked
        );
        println!("Overlap Count {}", summary.overlaps_reported);
    }
    Ok(())
}
