use std::process::ExitCode;

fn main() -> ExitCode {
    match log_filters::cli::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
