//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - configures logging
//! - resolves missing run parameters (prompting unless `--no-prompt`)
//! - drives the surface pipeline and prints the summary

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::debug;

use crate::cli::picker::{Prompter, discover_point_files};
use crate::cli::{Command, FieldsArgs, RunArgs};
use crate::error::AppError;
use crate::io::ingest::load_point_table;
use crate::models::ensure_projected_crs;

pub mod pipeline;

/// Entry point for the `interpoint` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `interpoint` and `interpoint --edge1 ...` behave like `interpoint run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Fields(args) => handle_fields(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn handle_fields(args: FieldsArgs) -> Result<(), AppError> {
    let table = load_point_table(&args.input)?;
    print!("{}", crate::report::format_field_table(&table));
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let run = if args.no_prompt {
        run_scripted(args)?
    } else {
        execute_run(args, Some(Prompter::stdio()))?
    };
    println!("{}", crate::report::format_run_summary(&run));
    Ok(())
}

/// Run without prompting: every value must come from `args`.
///
/// This is the `--no-prompt` path of the binary.
pub fn run_scripted(args: RunArgs) -> Result<pipeline::RunOutput, AppError> {
    execute_run::<io::Empty, io::Sink>(args, None)
}

/// Fills in missing values from the prompter, or fails naming the flag.
struct Resolver<R, W> {
    prompter: Option<Prompter<R, W>>,
    candidates: Option<Vec<PathBuf>>,
}

impl<R: BufRead, W: Write> Resolver<R, W> {
    fn value<T>(
        &mut self,
        given: Option<T>,
        flag: &str,
        ask: impl FnOnce(&mut Prompter<R, W>) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        if let Some(v) = given {
            return Ok(v);
        }
        match self.prompter.as_mut() {
            Some(p) => ask(p),
            None => Err(AppError::invalid(format!(
                "Missing {flag} (prompting disabled by --no-prompt)."
            ))),
        }
    }

    fn input_path(&mut self, given: Option<PathBuf>, num: usize) -> Result<PathBuf, AppError> {
        if given.is_none() && self.prompter.is_some() && self.candidates.is_none() {
            self.candidates = Some(discover_point_files());
        }
        let candidates = self.candidates.clone().unwrap_or_default();
        self.value(given, &format!("--edge{num}"), |p| p.input_path(num, &candidates))
    }
}

/// Resolve every parameter, running each validation gate as soon as its
/// inputs are known, then build and write the surface.
fn execute_run<R: BufRead, W: Write>(
    args: RunArgs,
    prompter: Option<Prompter<R, W>>,
) -> Result<pipeline::RunOutput, AppError> {
    let mut resolver = Resolver {
        prompter,
        candidates: None,
    };

    let mut first = resolve_edge(
        &mut resolver,
        1,
        args.edge1,
        args.m_field1,
        args.z_field1,
    )?;
    let mut second = resolve_edge(
        &mut resolver,
        2,
        args.edge2,
        args.m_field2,
        args.z_field2,
    )?;
    ensure_projected_crs(&first.edge, &second.edge)?;

    let pitch = resolver.value(args.pitch, "--pitch", |p| p.pitch())?;
    let i_div = resolver.value(args.i_div, "--i-div", |p| p.i_div())?;
    let output = match args.output {
        Some(path) => path,
        None => {
            let dir = resolver.value(args.out_dir, "--out-dir or -o", |p| p.out_dir())?;
            let name = resolver.value(args.out_name, "--out-name or -o", |p| p.out_name())?;
            output_path(&dir, &name)
        }
    };
    debug!("resolved pitch={pitch} i_div={i_div} output={}", output.display());

    let grid = pipeline::build_surface(&mut first.edge, &mut second.edge, pitch, i_div)?;
    pipeline::write_outputs(&grid, &output, args.export_csv.as_deref())?;

    Ok(pipeline::RunOutput {
        edge1: first.summary,
        edge2: second.summary,
        pitch,
        grid,
        output,
        export_csv: args.export_csv,
    })
}

fn resolve_edge<R: BufRead, W: Write>(
    resolver: &mut Resolver<R, W>,
    num: usize,
    path: Option<PathBuf>,
    field_m: Option<String>,
    field_z: Option<String>,
) -> Result<pipeline::PreparedEdge, AppError> {
    let path = resolver.input_path(path, num)?;
    let table = load_point_table(&path)?;
    let field_m = resolver.value(field_m, &format!("--m-field{num}"), |p| {
        p.field(&table, "longitudinal distance (m)")
    })?;
    let field_z = resolver.value(field_z, &format!("--z-field{num}"), |p| {
        p.field(&table, "value (z)")
    })?;
    pipeline::prepare_edge(table, &path, &field_m, &field_z, &format!("input {num}"))
}

/// `<dir>/<name>.geojson`, unless `name` already carries the extension.
fn output_path(dir: &Path, name: &str) -> PathBuf {
    if name.to_ascii_lowercase().ends_with(".geojson") {
        dir.join(name)
    } else {
        dir.join(format!("{name}.geojson"))
    }
}

/// Rewrite argv so `interpoint` defaults to `interpoint run`.
///
/// Rules:
/// - `interpoint`                      -> `interpoint run`
/// - `interpoint --edge1 a.geojson ...` -> `interpoint run --edge1 a.geojson ...`
/// - `interpoint --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "fields");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use super::*;
    use crate::error::ErrorKind;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_run() {
        assert_eq!(rewrite_args(args(&["interpoint"])), args(&["interpoint", "run"]));
        assert_eq!(
            rewrite_args(args(&["interpoint", "-v", "--pitch", "10"])),
            args(&["interpoint", "run", "-v", "--pitch", "10"])
        );
        assert_eq!(
            rewrite_args(args(&["interpoint", "fields", "a.geojson"])),
            args(&["interpoint", "fields", "a.geojson"])
        );
        assert_eq!(rewrite_args(args(&["interpoint", "--help"])), args(&["interpoint", "--help"]));
    }

    #[test]
    fn output_path_appends_extension_once() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, "grid"), dir.join("grid.geojson"));
        assert_eq!(output_path(dir, "grid.GeoJSON"), dir.join("grid.GeoJSON"));
    }

    fn edge_json(dy: f64, epsg: u32) -> String {
        let features: Vec<String> = [(0.0, 10.0), (20.0, 12.0)]
            .iter()
            .map(|(m, z)| {
                format!(
                    r#"{{ "type": "Feature", "properties": {{ "kyori": {m}, "z": {z} }},
                        "geometry": {{ "type": "Point", "coordinates": [{m}, {dy}] }} }}"#
                )
            })
            .collect();
        format!(
            r#"{{ "type": "FeatureCollection",
                "crs": {{ "type": "name", "properties": {{ "name": "urn:ogc:def:crs:EPSG::{epsg}" }} }},
                "features": [{}] }}"#,
            features.join(",")
        )
    }

    fn scripted(dir: &Path, epsg2: u32) -> RunArgs {
        let e1 = dir.join("edge1.geojson");
        let e2 = dir.join("edge2.geojson");
        fs::write(&e1, edge_json(0.0, 2449)).unwrap();
        fs::write(&e2, edge_json(10.0, epsg2)).unwrap();
        RunArgs {
            edge1: Some(e1),
            edge2: Some(e2),
            m_field1: Some("kyori".into()),
            z_field1: Some("z".into()),
            m_field2: Some("kyori".into()),
            z_field2: Some("z".into()),
            pitch: Some(5.0),
            i_div: Some(2),
            output: Some(dir.join("grid.geojson")),
            no_prompt: true,
            ..RunArgs::default()
        }
    }

    #[test]
    fn scripted_run_writes_grid() {
        let dir = tempfile::tempdir().unwrap();
        let run = run_scripted(scripted(dir.path(), 2449)).unwrap();
        assert_eq!(run.grid.rows(), 5);
        assert_eq!(run.grid.columns(), 3);
        assert!(dir.path().join("grid.geojson").is_file());
    }

    #[test]
    fn no_prompt_reports_missing_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = scripted(dir.path(), 2449);
        a.pitch = None;
        let err = run_scripted(a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.message().contains("--pitch"));
    }

    #[test]
    fn crs_gate_runs_before_remaining_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = scripted(dir.path(), 4612);
        a.pitch = None;
        a.no_prompt = false;
        // No input available: reaching the pitch prompt would fail differently.
        let prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        let err = execute_run(a, Some(prompter)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CrsMismatch);
        assert!(!dir.path().join("grid.geojson").exists());
    }

    #[test]
    fn prompts_fill_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = scripted(dir.path(), 2449);
        a.pitch = None;
        a.i_div = None;
        a.output = None;
        a.no_prompt = false;
        let answers = format!("5\n2\n{}\nsurface\n", dir.path().display());
        let prompter = Prompter::new(Cursor::new(answers.into_bytes()), Vec::new());
        let run = execute_run(a, Some(prompter)).unwrap();
        assert_eq!(run.output, dir.path().join("surface.geojson"));
        assert!(run.output.is_file());
    }
}
