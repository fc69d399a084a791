//! Command-line parsing.
//!
//! Every run parameter can come from a flag, from the environment (a `.env`
//! file is loaded first), or, failing both, from an interactive prompt in
//! `picker`. `--no-prompt` turns the last fallback into an error.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "interpoint",
    version,
    about = "Interpolate a 3-D point surface between two longitudinal edges"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the surface grid, prompting for anything not supplied.
    Run(RunArgs),
    /// List the fields of a GeoJSON point file with their types.
    Fields(FieldsArgs),
}

#[derive(Debug, Parser, Clone, Default)]
pub struct RunArgs {
    /// First edge (GeoJSON point file).
    #[arg(long, env = "INTERPOINT_EDGE1", value_name = "GEOJSON")]
    pub edge1: Option<PathBuf>,

    /// Second edge (GeoJSON point file).
    #[arg(long, env = "INTERPOINT_EDGE2", value_name = "GEOJSON")]
    pub edge2: Option<PathBuf>,

    /// Longitudinal-distance field of the first edge.
    #[arg(long = "m-field1", env = "INTERPOINT_M_FIELD1")]
    pub m_field1: Option<String>,

    /// Value field of the first edge.
    #[arg(long = "z-field1", env = "INTERPOINT_Z_FIELD1")]
    pub z_field1: Option<String>,

    /// Longitudinal-distance field of the second edge.
    #[arg(long = "m-field2", env = "INTERPOINT_M_FIELD2")]
    pub m_field2: Option<String>,

    /// Value field of the second edge.
    #[arg(long = "z-field2", env = "INTERPOINT_Z_FIELD2")]
    pub z_field2: Option<String>,

    /// Longitudinal spacing of the densified samples (> 0).
    #[arg(long, env = "INTERPOINT_PITCH")]
    pub pitch: Option<f64>,

    /// Number of transverse subdivisions (>= 1).
    #[arg(long = "i-div", env = "INTERPOINT_I_DIV")]
    pub i_div: Option<usize>,

    /// Output folder (combined with `--out-name`).
    #[arg(long = "out-dir", env = "INTERPOINT_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Output base name without extension (`.geojson` is appended).
    #[arg(long = "out-name", env = "INTERPOINT_OUT_NAME")]
    pub out_name: Option<String>,

    /// Full output path. Takes precedence over `--out-dir` + `--out-name`.
    #[arg(short = 'o', long, value_name = "GEOJSON")]
    pub output: Option<PathBuf>,

    /// Also export the grid as CSV (`i,m,z,x,y`).
    #[arg(long = "export-csv", env = "INTERPOINT_EXPORT_CSV", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Fail instead of prompting when a value is missing.
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(Debug, Parser)]
pub struct FieldsArgs {
    /// GeoJSON point file.
    #[arg(value_name = "GEOJSON")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_scripted_run() {
        let cli = Cli::try_parse_from([
            "interpoint",
            "run",
            "--edge1",
            "a.geojson",
            "--edge2",
            "b.geojson",
            "--m-field1",
            "kyori",
            "--pitch",
            "10",
            "--i-div",
            "10",
            "-o",
            "out.geojson",
            "--no-prompt",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.pitch, Some(10.0));
        assert_eq!(args.i_div, Some(10));
        assert_eq!(args.m_field1.as_deref(), Some("kyori"));
        assert!(args.no_prompt);
    }
}
