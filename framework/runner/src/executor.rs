use std::future::Future;

/// Bridges the synchronous virtual-user threads onto the shared Tokio runtime.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
}

impl Executor {
    pub(crate) fn new(runtime: tokio::runtime::Runtime) -> Self {
        Self { runtime }
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// The future is never cancelled. The run deadline is only observed between driver
    /// iterations, so a submission or poll that is in flight when the deadline passes runs to
    /// completion.
    pub fn run<T>(&self, fut: impl Future<Output = T>) -> T {
        self.runtime.block_on(fut)
    }

    /// Submit async code to be run in the background.
    ///
    /// There is no guarantee that the future completes before the runner finishes.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(fut);
    }
}
