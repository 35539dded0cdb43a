//! Custom integration API endpoints

use codestream_core::domain::custom_integration::CustomIntegration;
use codestream_core::dto::documents::DocumentsList;
use codestream_core::query::{Lookup, ResourceQuery};
use reqwest::Method;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::CodeStreamClient;
use crate::error::Result;

const CUSTOM_INTEGRATIONS_PATH: &str = "/pipeline/api/custom-integrations";

impl CodeStreamClient {
    // =============================================================================
    // Custom Integrations
    // =============================================================================

    /// List custom integrations matching a query
    pub async fn get_custom_integrations(
        &self,
        query: &ResourceQuery,
    ) -> Result<Vec<CustomIntegration>> {
        let params = match query.lookup(None) {
            Lookup::ById(id) => return Ok(vec![self.get_custom_integration(&id).await?]),
            Lookup::List(params) => params,
        };
        debug!(filter = ?params.filter, "listing custom integrations");

        let response = self
            .authorized(Method::GET, CUSTOM_INTEGRATIONS_PATH)
            .header(ACCEPT, "application/json")
            .query(&params.to_query())
            .send()
            .await?;

        let list: DocumentsList<CustomIntegration> = self.handle_response(response).await?;
        Ok(list.into_ordered())
    }

    /// Get a custom integration by ID
    pub async fn get_custom_integration(&self, id: &str) -> Result<CustomIntegration> {
        let path = format!("{}/{}", CUSTOM_INTEGRATIONS_PATH, id);
        let response = self.api(Method::GET, &path).send().await?;

        self.handle_response(response).await
    }

    /// Register a new custom integration
    pub async fn create_custom_integration(
        &self,
        integration: &CustomIntegration,
    ) -> Result<CustomIntegration> {
        let response = self
            .api(Method::POST, CUSTOM_INTEGRATIONS_PATH)
            .json(integration)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Replace an existing custom integration
    pub async fn update_custom_integration(
        &self,
        id: &str,
        integration: &CustomIntegration,
    ) -> Result<CustomIntegration> {
        let path = format!("{}/{}", CUSTOM_INTEGRATIONS_PATH, id);
        let response = self.api(Method::PUT, &path).json(integration).send().await?;

        self.handle_response(response).await
    }

    /// Delete a custom integration
    ///
    /// # Returns
    /// The deleted integration
    pub async fn delete_custom_integration(&self, id: &str) -> Result<CustomIntegration> {
        let path = format!("{}/{}", CUSTOM_INTEGRATIONS_PATH, id);
        let response = self.api(Method::DELETE, &path).send().await?;

        self.handle_response(response).await
    }
}
