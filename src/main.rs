use std::process::ExitCode;

fn main() -> ExitCode {
    match mortgage_quote::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mq: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
