use std::process::ExitCode;

fn main() -> ExitCode {
    match interpoint::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("interpoint: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
