use futures::stream::{self, StreamExt};

use crate::plan::Plan;
use crate::search::{QueryResults, SearchApi, SearchParams};
use crate::store::{Store, StoreError};

/// Runs the search stage: fans out the plan's queries and persists results.
///
/// Queries run concurrently up to the configured limit. Each query's
/// results are written as soon as they arrive, so a crash mid-stage
/// loses at most the in-flight queries. A failed query is logged and
/// counted; it never aborts the stage.
pub struct Executor<W: SearchApi> {
    search: W,
    params: SearchParams,
    concurrency: usize,
}

/// Counters for one search stage run.
#[derive(Debug, Default)]
pub struct ExecutionSummary {
    /// Queries taken from the plan
    pub attempted: usize,
    /// Queries whose results were written to the store
    pub saved: usize,
    /// Queries that failed at the search API
    pub failed: usize,
    /// One message per failed query
    pub errors: Vec<String>,
}

impl<W: SearchApi> Executor<W> {
    /// Creates a new executor with the default search parameters.
    pub fn new(search: W, concurrency: usize) -> Self {
        Self {
            search,
            params: SearchParams::default(),
            concurrency: concurrency.max(1),
        }
    }

    /// Overrides the search parameters used for every query.
    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    /// Executes every query in the plan against the search API.
    ///
    /// Search failures are isolated per query; a store write failure
    /// aborts the stage since later steps depend on the files.
    pub async fn run<S: Store>(
        &self,
        store: &S,
        session_id: &str,
        plan: &Plan,
    ) -> Result<ExecutionSummary, StoreError> {
        let jobs: Vec<(String, String)> = plan
            .categories
            .iter()
            .flat_map(|c| c.queries.iter().map(move |q| (c.name.clone(), q.clone())))
            .collect();

        let mut summary = ExecutionSummary {
            attempted: jobs.len(),
            ..Default::default()
        };

        let search = &self.search;
        let params = &self.params;

        let mut outcomes = stream::iter(jobs.into_iter().map(|(category, query)| async move {
            let outcome = search.search(&query, params).await;
            (category, query, outcome)
        }))
        .buffer_unordered(self.concurrency);

        while let Some((category, query, outcome)) = outcomes.next().await {
            match outcome {
                Ok(results) => {
                    tracing::debug!(
                        category = %category,
                        query = %query,
                        results = results.len(),
                        "query completed"
                    );
                    let record = QueryResults { query, results };
                    store.save_results(session_id, &category, &record)?;
                    summary.saved += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        category = %category,
                        query = %query,
                        error = %err,
                        "query failed, continuing"
                    );
                    summary.failed += 1;
                    summary.errors.push(format!("{category}/{query}: {err}"));
                }
            }
        }

        Ok(summary)
    }
}
