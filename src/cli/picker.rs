//! Interactive prompts.
//!
//! This is kept separate from clap parsing:
//! - clap handles structured flags/subcommands/environment
//! - the prompter asks for whatever is still missing
//!
//! Input files are picked from `*.geojson` / `*.json` files found under the
//! current working directory, or typed as a path. `q` cancels any prompt.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::domain::PointTable;
use crate::error::{AppError, ErrorKind};
use crate::report::format_field_table;

/// Default directory recursion depth for finding point files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Extensions accepted as GeoJSON input.
const POINT_FILE_EXTENSIONS: [&str; 2] = ["geojson", "json"];

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `message` and read one trimmed line. `q` cancels.
    fn ask(&mut self, message: &str) -> Result<String, AppError> {
        writeln!(self.output, "{message}").map_err(write_err)?;
        write!(self.output, ">> ").map_err(write_err)?;
        self.output.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = self
            .input
            .read_line(&mut line)
            .map_err(|e| AppError::io(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::invalid(
                "No input received. Pass the missing values as flags (see --help).",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(ErrorKind::Canceled, "Canceled."));
        }
        Ok(line.to_string())
    }

    fn say(&mut self, message: &str) -> Result<(), AppError> {
        writeln!(self.output, "{message}").map_err(write_err)
    }

    /// Ask until `parse` accepts the answer.
    fn ask_parsed<T>(
        &mut self,
        message: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<T, AppError> {
        loop {
            let answer = self.ask(message)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(reason) => self.say(&reason)?,
            }
        }
    }

    /// Pick input file number `num` (1 or 2) from the discovered files or a
    /// typed path.
    pub fn input_path(&mut self, num: usize, candidates: &[PathBuf]) -> Result<PathBuf, AppError> {
        if !candidates.is_empty() {
            self.say(&format!("Found {} point file(s):", candidates.len()))?;
            for (idx, path) in candidates.iter().enumerate() {
                self.say(&format!("{:>3}) {}", idx + 1, pretty_path(path)))?;
            }
        }

        let message = if candidates.is_empty() {
            format!("Input file {num}: type a path (q to quit)")
        } else {
            format!(
                "Input file {num}: select by number (1-{}) or type a path (q to quit)",
                candidates.len()
            )
        };

        self.ask_parsed(&message, |answer| {
            if let Ok(choice) = answer.parse::<usize>() {
                if (1..=candidates.len()).contains(&choice) {
                    return validate_point_path(&candidates[choice - 1]).map_err(|e| e.to_string());
                }
                if !candidates.is_empty() {
                    return Err(format!(
                        "Invalid choice: {choice}. Enter a number between 1 and {}.",
                        candidates.len()
                    ));
                }
            }
            validate_point_path(Path::new(answer)).map_err(|e| e.to_string())
        })
    }

    /// Show the field table and return the name of the chosen field.
    pub fn field(&mut self, table: &PointTable, what: &str) -> Result<String, AppError> {
        if table.fields.is_empty() {
            return Err(AppError::invalid("Input has no attribute fields."));
        }
        self.say(format_field_table(table).trim_end())?;
        self.ask_parsed(&format!("Field number holding the {what}"), |answer| {
            parse_field_index(answer, table.fields.len())
                .map(|idx| table.fields[idx].name.clone())
        })
    }

    pub fn pitch(&mut self) -> Result<f64, AppError> {
        self.ask_parsed("Longitudinal pitch", parse_pitch)
    }

    pub fn i_div(&mut self) -> Result<usize, AppError> {
        self.ask_parsed("Number of transverse divisions", parse_i_div)
    }

    pub fn out_dir(&mut self) -> Result<PathBuf, AppError> {
        self.ask_parsed("Output folder", |answer| {
            let dir = PathBuf::from(answer);
            if dir.is_dir() {
                Ok(dir)
            } else {
                Err(format!("Not a folder: {answer}"))
            }
        })
    }

    pub fn out_name(&mut self) -> Result<String, AppError> {
        self.ask_parsed("Output file name (no extension)", parse_out_name)
    }
}

fn write_err(e: io::Error) -> AppError {
    AppError::io(format!("Failed to write prompt: {e}"))
}

pub fn parse_pitch(s: &str) -> Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("Invalid pitch: {s} (enter a positive number).")),
    }
}

pub fn parse_i_div(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(v) if v >= 1 => Ok(v),
        _ => Err(format!("Invalid division count: {s} (enter an integer >= 1).")),
    }
}

pub fn parse_field_index(s: &str, len: usize) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(v) if v < len => Ok(v),
        _ => Err(format!("Invalid field number: {s} (enter 0-{}).", len.saturating_sub(1))),
    }
}

pub fn parse_out_name(s: &str) -> Result<String, String> {
    let name = s.trim();
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(format!("Invalid file name: `{s}`."));
    }
    Ok(name.to_string())
}

/// Validate the provided path points to a GeoJSON file.
pub fn validate_point_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::io(format!("Input file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::io(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_point_extension(path) {
        return Err(AppError::invalid(format!(
            "Expected a .geojson or .json file (got: {}).",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Discover point files under the current directory (deterministic order).
pub fn discover_point_files() -> Vec<PathBuf> {
    find_point_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn find_point_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_point_files_inner(root, 0, max_depth, &mut out);
    out.sort_by(|a, b| pretty_path(a).cmp(&pretty_path(b)));
    out
}

fn find_point_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if should_skip_dir(&path) {
                continue;
            }
            find_point_files_inner(&path, depth + 1, max_depth, out);
            continue;
        }

        if file_type.is_file() && has_point_extension(&path) {
            out.push(path);
        }
    }
}

fn has_point_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| POINT_FILE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::io::ingest::parse_point_table;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn parsers_reject_out_of_range() {
        assert_eq!(parse_pitch("10"), Ok(10.0));
        assert!(parse_pitch("0").is_err());
        assert!(parse_pitch("-2.5").is_err());
        assert!(parse_pitch("abc").is_err());
        assert_eq!(parse_i_div("10"), Ok(10));
        assert!(parse_i_div("0").is_err());
        assert_eq!(parse_field_index("1", 2), Ok(1));
        assert!(parse_field_index("2", 2).is_err());
        assert!(parse_out_name("a/b").is_err());
        assert_eq!(parse_out_name(" grid "), Ok("grid".to_string()));
    }

    #[test]
    fn reprompts_until_valid() {
        let mut p = prompter("zero\n0\n12.5\n");
        assert_eq!(p.pitch().unwrap(), 12.5);
        let shown = String::from_utf8(p.output).unwrap();
        assert_eq!(shown.matches("Invalid pitch").count(), 2);
    }

    #[test]
    fn q_cancels_and_eof_fails() {
        let err = prompter("q\n").i_div().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Canceled);
        let err = prompter("").i_div().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn field_prompt_returns_name() {
        let table = parse_point_table(
            r#"{ "type": "FeatureCollection", "features": [
                { "type": "Feature", "properties": { "kyori": 0, "z": 1.5 },
                  "geometry": { "type": "Point", "coordinates": [0, 0] } } ] }"#,
        )
        .unwrap();
        let mut p = prompter("5\n1\n");
        assert_eq!(p.field(&table, "value").unwrap(), "z");
    }

    #[test]
    fn input_path_by_number_or_path() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.geojson");
        let b = dir.path().join("b.json");
        fs::write(&a, "{}").unwrap();
        fs::write(&b, "{}").unwrap();
        let candidates = vec![a.clone(), b.clone()];

        let mut p = prompter("2\n");
        assert_eq!(p.input_path(1, &candidates).unwrap(), b);

        let typed = format!("9\n{}\n", a.display());
        let mut p = prompter(&typed);
        assert_eq!(p.input_path(2, &candidates).unwrap(), a);
    }

    #[test]
    fn finds_point_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("edge1.geojson"), "{}").unwrap();
        fs::write(dir.path().join("sub").join("edge2.JSON"), "{}").unwrap();
        fs::write(dir.path().join("target").join("skip.geojson"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let found = find_point_files(dir.path(), DEFAULT_SEARCH_DEPTH);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| has_point_extension(p)));
    }
}
