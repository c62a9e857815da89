//! eToken signer CLI
//!
//! `etokensign <certificate file> <container> <PIN> <timestamp URL> <file>`
//! logs into the token and signs the file in place. Exit code 0 on success,
//! 1 on any usage or signing failure.

use std::process::ExitCode;

use clap::error::ErrorKind;
use etoken_signer::{
    cli::SignArgs, connect_platform_provider, infra::logging::init_logging, ConfigManager,
    SignWorkflow,
};
use miette::Result;

fn main() -> ExitCode {
    let args = match SignArgs::parse_from_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            // clap writes help/version to stdout and errors (with usage) to stderr
            let printed = e.print().is_ok();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion if printed => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: SignArgs) -> Result<()> {
    let config = ConfigManager::new().load_or_default()?;
    init_logging(config.log_level()?);

    let job = args.into_job(&config)?;
    let provider = connect_platform_provider()?;

    let outcome = SignWorkflow::new(provider.as_ref()).run(&job.request, &job.pin)?;
    log::info!(
        "Signing took {:.2}s{}",
        outcome.duration.as_secs_f64(),
        outcome
            .timestamp_url
            .as_deref()
            .map(|url| format!(", timestamped by {url}"))
            .unwrap_or_default()
    );

    println!("Successfully signed {}", outcome.signed_file.display());
    Ok(())
}
