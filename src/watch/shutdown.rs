use tokio::select;
use tokio_util::sync::CancellationToken;

/// Detects signals sent to the process and cancels the running loops. Every mutation is
/// persisted when it happens, so there is nothing to flush on the way out.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
    };
}
