// Third-party integrations resource client.
//
// Base path: groups/{projectID}/integrations
// Item path: groups/{projectID}/integrations/{integrationType}

use std::sync::Arc;

use reqwest::Method;
use tracing::debug;

use super::types::{IntegrationConfig, IntegrationListResult};
use crate::client::{ApiClient, Response, Transport};
use crate::error::Error;

const NO_BODY: Option<&()> = None;

fn require(name: &'static str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::must_be_set(name));
    }
    Ok(())
}

fn integrations_path(project_id: &str) -> String {
    format!("groups/{project_id}/integrations")
}

fn integration_path(project_id: &str, integration_type: &str) -> String {
    format!("{}/{integration_type}", integrations_path(project_id))
}

/// Copy envelope links into the call metadata when the body carried any.
fn propagate_links(result: &IntegrationListResult, response: &mut Response) {
    if !result.links.is_empty() {
        response.links.clone_from(&result.links);
    }
}

/// Client for the third-party integration settings of a project.
///
/// Holds a shared handle to the generic client; cloning is cheap and every
/// call is an independent request/response round trip.
pub struct IntegrationsClient<T = ApiClient> {
    transport: Arc<T>,
}

impl<T> Clone for IntegrationsClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> IntegrationsClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// The generic client this resource client delegates to.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Add a third-party integration configuration.
    ///
    /// The API answers with the project's full integration list.
    pub async fn create(
        &self,
        project_id: &str,
        integration_type: &str,
        config: &IntegrationConfig,
    ) -> Result<(IntegrationListResult, Response), Error> {
        self.write(Method::POST, project_id, integration_type, config)
            .await
    }

    /// Replace the configuration for `integration_type`, creating it if
    /// absent. Not a partial merge: unset fields are cleared remotely.
    pub async fn replace(
        &self,
        project_id: &str,
        integration_type: &str,
        config: &IntegrationConfig,
    ) -> Result<(IntegrationListResult, Response), Error> {
        self.write(Method::PUT, project_id, integration_type, config)
            .await
    }

    /// Remove the configuration for `integration_type`.
    pub async fn delete(&self, project_id: &str, integration_type: &str) -> Result<Response, Error> {
        require("projectID", project_id)?;
        require("integrationType", integration_type)?;
        debug!(project_id, integration_type, "deleting integration");

        let path = integration_path(project_id, integration_type);
        let req = self
            .transport
            .new_request(Method::DELETE, &path, NO_BODY)?;
        self.transport.execute_empty(req).await
    }

    /// Fetch the configuration for a single integration type.
    pub async fn get(
        &self,
        project_id: &str,
        integration_type: &str,
    ) -> Result<(IntegrationConfig, Response), Error> {
        require("projectID", project_id)?;
        require("integrationType", integration_type)?;
        debug!(project_id, integration_type, "fetching integration");

        let path = integration_path(project_id, integration_type);
        let req = self.transport.new_request(Method::GET, &path, NO_BODY)?;
        self.transport.execute(req).await
    }

    /// List every integration configured for the project.
    pub async fn list(&self, project_id: &str) -> Result<(IntegrationListResult, Response), Error> {
        require("projectID", project_id)?;
        debug!(project_id, "listing integrations");

        let path = integrations_path(project_id);
        let req = self.transport.new_request(Method::GET, &path, NO_BODY)?;
        let (result, mut response) = self.transport.execute(req).await?;
        propagate_links(&result, &mut response);
        Ok((result, response))
    }

    async fn write(
        &self,
        method: Method,
        project_id: &str,
        integration_type: &str,
        config: &IntegrationConfig,
    ) -> Result<(IntegrationListResult, Response), Error> {
        require("projectID", project_id)?;
        require("integrationType", integration_type)?;
        debug!(project_id, integration_type, %method, "writing integration");

        let path = integration_path(project_id, integration_type);
        let req = self.transport.new_request(method, &path, Some(config))?;
        let (result, mut response) = self.transport.execute(req).await?;
        propagate_links(&result, &mut response);
        Ok((result, response))
    }
}
