//! Runs one top-level operation under Ctrl-C cancellation and turns its
//! outcome into the process exit code.

use colored::Colorize;
use std::future::Future;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// Run `operation` with a token that is cancelled on the first Ctrl-C.
pub async fn run<F, Fut>(operation: F) -> ExitCode
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), Error>>,
{
    let token = CancellationToken::new();
    let listener = tokio::spawn(cancel_on_interrupt(token.clone()));

    let result = operation(token).await;
    listener.abort();

    if let Err(err) = &result {
        if err.is_reported() {
            report(err);
        }
    }
    ExitCode::from(status(&result))
}

/// Cancel `token` once, on the first interrupt. Not re-armed.
async fn cancel_on_interrupt(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::debug!("Interrupt received, cancelling");
            token.cancel();
        }
        Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
    }
}

fn report(err: &Error) {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Exit status for an outcome. Errors never map to 0; codes outside the
/// 0..=255 range the OS reports become 1.
fn status(result: &Result<(), Error>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => match u8::try_from(err.exit_code()) {
            Ok(0) | Err(_) => 1,
            Ok(code) => code,
        },
    }
}
