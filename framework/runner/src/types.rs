/// Recommended error type for a scenario suite's `main` function. Compatible with the error
/// handling inside the runner so you can use `?` to propagate errors.
pub type PaperloadResult<T> = anyhow::Result<T>;
