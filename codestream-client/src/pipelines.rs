//! Pipeline-related API endpoints

use codestream_core::domain::pipeline::Pipeline;
use codestream_core::dto::documents::DocumentsList;
use codestream_core::dto::pipeline::{ImportMode, ImportResult, PatchPipeline, PipelineDocument};
use codestream_core::query::{API_VERSION, Lookup, ResourceQuery};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::CodeStreamClient;
use crate::error::{ClientError, Result};

const PIPELINES_PATH: &str = "/pipeline/api/pipelines";
const IMPORT_PATH: &str = "/pipeline/api/import";
const EXPORT_PATH: &str = "/pipeline/api/export";
const YAML: &str = "application/x-yaml";

impl CodeStreamClient {
    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// List pipelines matching a query
    ///
    /// An id in the query skips filtering and fetches that single pipeline.
    /// Lists come back in the service's natural order.
    ///
    /// # Example
    /// ```no_run
    /// # use codestream_client::CodeStreamClient;
    /// # use codestream_core::query::ResourceQuery;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = CodeStreamClient::new("https://vra.example.com");
    /// let pipelines = client
    ///     .get_pipelines(&ResourceQuery::new().with_project("production"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_pipelines(&self, query: &ResourceQuery) -> Result<Vec<Pipeline>> {
        let params = match query.lookup(None) {
            Lookup::ById(id) => return Ok(vec![self.get_pipeline(&id).await?]),
            Lookup::List(params) => params,
        };
        debug!(filter = ?params.filter, "listing pipelines");

        let response = self
            .authorized(Method::GET, PIPELINES_PATH)
            .header(ACCEPT, "application/json")
            .query(&params.to_query())
            .send()
            .await?;

        let list: DocumentsList<Pipeline> = self.handle_response(response).await?;
        Ok(list.into_ordered())
    }

    /// Get a pipeline by ID
    pub async fn get_pipeline(&self, id: &str) -> Result<Pipeline> {
        let path = format!("{}/{}", PIPELINES_PATH, id);
        let response = self.api(Method::GET, &path).send().await?;

        self.handle_response(response).await
    }

    /// Partially update a pipeline
    ///
    /// # Arguments
    /// * `id` - The pipeline ID
    /// * `patch` - Fields to change; unset fields are left alone
    ///
    /// # Returns
    /// The updated pipeline
    pub async fn patch_pipeline(&self, id: &str, patch: &PatchPipeline) -> Result<Pipeline> {
        let path = format!("{}/{}", PIPELINES_PATH, id);
        let response = self.api(Method::PATCH, &path).json(patch).send().await?;

        self.handle_response(response).await
    }

    /// Delete a pipeline
    ///
    /// # Returns
    /// The deleted pipeline
    pub async fn delete_pipeline(&self, id: &str) -> Result<Pipeline> {
        let path = format!("{}/{}", PIPELINES_PATH, id);
        let response = self.api(Method::DELETE, &path).send().await?;

        self.handle_response(response).await
    }

    /// Import a YAML pipeline definition
    ///
    /// `ImportMode::Create` fails if the pipeline exists; `ImportMode::Apply`
    /// updates it in place.
    ///
    /// # Returns
    /// The per-document results reported by the service
    pub async fn import_pipeline(
        &self,
        document: &PipelineDocument,
        mode: ImportMode,
    ) -> Result<Vec<ImportResult>> {
        let body = document
            .to_yaml()
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

        let response = self
            .authorized(Method::POST, IMPORT_PATH)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, YAML)
            .query(&[("apiVersion", API_VERSION), ("action", mode.as_str())])
            .body(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Export a pipeline definition as YAML
    pub async fn export_pipeline(&self, name: &str, project: &str) -> Result<String> {
        let response = self
            .authorized(Method::GET, EXPORT_PATH)
            .header(ACCEPT, YAML)
            .query(&[
                ("apiVersion", API_VERSION),
                ("pipelines", name),
                ("project", project),
            ])
            .send()
            .await?;

        self.handle_text_response(response).await
    }
}
