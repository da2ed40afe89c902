use paperload_instruments::ResultsCollector;

use crate::catalog::ScenarioCatalog;
use crate::cli::RunConfig;
use crate::client::JobClient;
use crate::executor::Executor;

/// Everything the virtual users share: the executor, the job client, the catalog, the results
/// log and the run configuration. All of it is read-only apart from the append-only collector.
#[derive(Debug)]
pub struct RunnerContext {
    executor: Executor,
    client: JobClient,
    catalog: ScenarioCatalog,
    collector: ResultsCollector,
    config: RunConfig,
}

impl RunnerContext {
    pub(crate) fn new(
        executor: Executor,
        client: JobClient,
        catalog: ScenarioCatalog,
        collector: ResultsCollector,
        config: RunConfig,
    ) -> Self {
        Self {
            executor,
            client,
            catalog,
            collector,
            config,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn client(&self) -> &JobClient {
        &self.client
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn collector(&self) -> &ResultsCollector {
        &self.collector
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}
