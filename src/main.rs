use std::process::ExitCode;

fn main() -> ExitCode {
    sprout::cli::start_cli()
}
