use async_trait::async_trait;
use galley_application::{WorkflowExecution, WorkflowGateway};
use galley_core::AppResult;
use serde_json::Value;
use url::Url;

use crate::vendor_http::{endpoint, parse_base_url, send_vendor_request};


const VENDOR: &str = "workflow vendor";

/// Workflow gateway posting to n8n webhook URLs.
#[derive(Clone)]
pub struct N8nWorkflowGateway {
    http_client: reqwest::Client,
    webhook_base_url: Url,
    webhook_token: Option<String>,
}

impl N8nWorkflowGateway {
    /// Creates a gateway; `webhook_token` is sent as a bearer token when set.
    pub fn new(
        http_client: reqwest::Client,
        webhook_base_url: &str,
        webhook_token: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client,
            webhook_base_url: parse_base_url("N8N_WEBHOOK_BASE_URL", webhook_base_url)?,
            webhook_token: webhook_token.filter(|token| !token.trim().is_empty()),
        })
    }
}

#[async_trait]
impl WorkflowGateway for N8nWorkflowGateway {
    async fn execute_workflow(&self, execution: &WorkflowExecution) -> AppResult<Value> {
        let segments = execution
            .workflow_id
            .as_str()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        let url = endpoint(&self.webhook_base_url, segments.as_slice())?;

        let mut request = self.http_client.post(url).json(&execution.payload);
        if let Some(token) = &self.webhook_token {
            request = request.bearer_auth(token);
        }

        send_vendor_request(VENDOR, request).await
    }
}
