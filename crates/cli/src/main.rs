use std::process::ExitCode;

fn main() -> ExitCode {
    fyndy_cli::run()
}
