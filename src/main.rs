use std::io;
use std::process::ExitCode;

use damson_chess::cli::repl;

fn main() -> ExitCode {
    match repl::run_stdio_loop() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if error.kind() == io::ErrorKind::BrokenPipe {
                return ExitCode::SUCCESS;
            }
            eprintln!("io error: {error}");
            ExitCode::FAILURE
        }
    }
}
