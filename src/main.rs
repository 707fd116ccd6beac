use anyhow::Result;
use routinely::cli::run_cli;
use tracing::error;

// Everything in this application is one user action or one timer at a time, so a
// current-thread runtime is all it needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    run_cli().await.inspect_err(|e| {
        error!("Error running cli {e:?}");
    })?;
    Ok(())
}
