// codeshrink binary: thin wrapper over the library's CLI handler

use anyhow::Context;
use codeshrink::cli::CliHandler;
use codeshrink::MinifyError;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        match e.downcast_ref::<MinifyError>() {
            Some(err) => eprintln!("Error: {}", err.format_detailed()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    CliHandler::new()
        .run()
        .await
        .context("codeshrink failed")
}
