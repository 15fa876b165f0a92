use std::process::ExitCode;

use brain::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let _guard = brain::logging::init();
    match Cli::handle().await {
        0 => ExitCode::SUCCESS,
        code => ExitCode::from(u8::try_from(code).unwrap_or(1)),
    }
}
