//! Off-runtime execution for blocking filesystem walks.

/// Runs `task` on tokio's blocking pool and returns its result.
///
/// A panic inside `task` is resumed on the calling task.
pub(crate) async fn run_blocking<F, T>(task: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(value) => value,
        Err(error) => std::panic::resume_unwind(error.into_panic()),
    }
}
