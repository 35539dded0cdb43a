//! Execution-related API endpoints

use codestream_core::domain::execution::Execution;
use codestream_core::dto::documents::DocumentsList;
use codestream_core::dto::execution::{CreateExecution, CreateExecutionResponse};
use codestream_core::query::{Lookup, ORDER_BY_REQUEST_TIME_DESC, ResourceQuery};
use reqwest::Method;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::CodeStreamClient;
use crate::error::Result;

const EXECUTIONS_PATH: &str = "/pipeline/api/executions";

impl CodeStreamClient {
    // =============================================================================
    // Executions
    // =============================================================================

    /// List executions matching a query, newest first
    ///
    /// An id in the query skips filtering and fetches that single execution.
    pub async fn get_executions(&self, query: &ResourceQuery) -> Result<Vec<Execution>> {
        let params = match query.lookup(Some(ORDER_BY_REQUEST_TIME_DESC)) {
            Lookup::ById(id) => return Ok(vec![self.get_execution(&id).await?]),
            Lookup::List(params) => params,
        };
        debug!(filter = ?params.filter, "listing executions");

        let response = self
            .authorized(Method::GET, EXECUTIONS_PATH)
            .header(ACCEPT, "application/json")
            .query(&params.to_query())
            .send()
            .await?;

        let list: DocumentsList<Execution> = self.handle_response(response).await?;
        Ok(list.into_ordered())
    }

    /// Get an execution by ID
    pub async fn get_execution(&self, id: &str) -> Result<Execution> {
        let path = format!("{}/{}", EXECUTIONS_PATH, id);
        let response = self.api(Method::GET, &path).send().await?;

        self.handle_response(response).await
    }

    /// Delete an execution
    ///
    /// # Returns
    /// The deleted execution
    pub async fn delete_execution(&self, id: &str) -> Result<Execution> {
        let path = format!("{}/{}", EXECUTIONS_PATH, id);
        let response = self.api(Method::DELETE, &path).send().await?;

        self.handle_response(response).await
    }

    /// Trigger a run of a pipeline
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline to run
    /// * `req` - Inputs and comments for the run
    pub async fn create_execution(
        &self,
        pipeline_id: &str,
        req: &CreateExecution,
    ) -> Result<CreateExecutionResponse> {
        let path = format!("/pipeline/api/pipelines/{}/executions", pipeline_id);
        let response = self.api(Method::POST, &path).json(req).send().await?;

        self.handle_response(response).await
    }
}
