use async_trait::async_trait;
use galley_core::{AppResult, NonEmptyString, VerifiedUser};
use serde_json::{Map, Value};

/// Identity-provider port resolving bearer tokens to users.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Looks up the user owning `access_token`.
    ///
    /// Returns `AppError::Unauthorized` for tokens the provider rejects and
    /// `AppError::Unavailable` when the provider cannot be reached.
    async fn verify_access_token(&self, access_token: &str) -> AppResult<VerifiedUser>;
}

/// Raw records query payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordsQueryInput {
    /// Target table name or id.
    pub table: Option<String>,
    /// Vendor formula restricting returned rows.
    pub filter_by_formula: Option<String>,
    /// Upper bound on returned rows.
    pub max_records: Option<u32>,
    /// Vendor view name.
    pub view: Option<String>,
}

/// Raw records create payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsCreateInput {
    /// Target table name or id.
    pub table: Option<String>,
    /// Rows shaped as `{ "fields": { ... } }`.
    pub records: Option<Vec<Value>>,
}

/// Raw workflow execution payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowExecuteInput {
    /// Workflow identifier or webhook path.
    pub workflow_id: Option<String>,
    /// JSON body forwarded to the workflow.
    pub payload: Option<Value>,
}

/// Validated records query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsQuery {
    /// Target table name or id.
    pub table: NonEmptyString,
    /// Vendor formula restricting returned rows.
    pub filter_by_formula: Option<String>,
    /// Upper bound on returned rows.
    pub max_records: Option<u32>,
    /// Vendor view name.
    pub view: Option<String>,
}

/// Validated records create request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordsCreate {
    /// Target table name or id.
    pub table: NonEmptyString,
    /// Field maps, one per row; never empty.
    pub rows: Vec<Map<String, Value>>,
}

/// Validated workflow execution.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowExecution {
    /// Workflow identifier or webhook path, without leading slashes.
    pub workflow_id: NonEmptyString,
    /// JSON body forwarded to the workflow.
    pub payload: Value,
}

/// Records vendor port.
#[async_trait]
pub trait RecordsGateway: Send + Sync {
    /// Lists rows of a table.
    async fn query_records(&self, query: &RecordsQuery) -> AppResult<Value>;

    /// Creates rows in a table.
    async fn create_records(&self, request: &RecordsCreate) -> AppResult<Value>;
}

/// Workflow vendor port.
#[async_trait]
pub trait WorkflowGateway: Send + Sync {
    /// Triggers one workflow webhook.
    async fn execute_workflow(&self, execution: &WorkflowExecution) -> AppResult<Value>;
}
