//! Forwarding of verified client calls to the records and workflow vendors.

use std::sync::Arc;

use galley_core::{AppError, AppResult, NonEmptyString, VerifiedUser};
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::{
    RecordsCreate, RecordsCreateInput, RecordsGateway, RecordsQuery, RecordsQueryInput,
    WorkflowExecuteInput, WorkflowExecution, WorkflowGateway,
};

#[cfg(test)]
mod tests;

/// Application service for the vendor proxy.
///
/// Inputs are validated before the vendor configuration is checked, and both
/// happen before any outbound request.
#[derive(Clone)]
pub struct ProxyService {
    records_gateway: Option<Arc<dyn RecordsGateway>>,
    workflow_gateway: Option<Arc<dyn WorkflowGateway>>,
}

impl ProxyService {
    /// Creates the service; `None` marks a vendor as unconfigured.
    #[must_use]
    pub fn new(
        records_gateway: Option<Arc<dyn RecordsGateway>>,
        workflow_gateway: Option<Arc<dyn WorkflowGateway>>,
    ) -> Self {
        Self {
            records_gateway,
            workflow_gateway,
        }
    }

    /// Lists vendor records for a verified caller.
    pub async fn records_query(
        &self,
        caller: &VerifiedUser,
        input: RecordsQueryInput,
    ) -> AppResult<Value> {
        let query = validate_records_query(input)?;
        let gateway = self.records_gateway()?;

        info!(
            user_id = %caller.user_id(),
            table = query.table.as_str(),
            max_records = query.max_records,
            "proxying records query"
        );
        gateway.query_records(&query).await
    }

    /// Creates vendor records for a verified caller.
    pub async fn records_create(
        &self,
        caller: &VerifiedUser,
        input: RecordsCreateInput,
    ) -> AppResult<Value> {
        let request = validate_records_create(input)?;
        let gateway = self.records_gateway()?;

        info!(
            user_id = %caller.user_id(),
            table = request.table.as_str(),
            rows = request.rows.len(),
            "proxying records create"
        );
        gateway.create_records(&request).await
    }

    /// Triggers a vendor workflow for a verified caller.
    pub async fn workflow_execute(
        &self,
        caller: &VerifiedUser,
        input: WorkflowExecuteInput,
    ) -> AppResult<Value> {
        let execution = validate_workflow_execution(input)?;
        let Some(gateway) = &self.workflow_gateway else {
            error!("workflow vendor is not configured");
            return Err(AppError::Configuration(
                "workflow service is not configured".to_owned(),
            ));
        };

        info!(
            user_id = %caller.user_id(),
            workflow_id = execution.workflow_id.as_str(),
            "proxying workflow execution"
        );
        gateway.execute_workflow(&execution).await
    }

    fn records_gateway(&self) -> AppResult<&Arc<dyn RecordsGateway>> {
        self.records_gateway.as_ref().ok_or_else(|| {
            error!("records vendor is not configured");
            AppError::Configuration("records service is not configured".to_owned())
        })
    }
}

fn required_field(value: Option<String>, field: &str) -> AppResult<NonEmptyString> {
    value
        .and_then(|value| NonEmptyString::new(value.trim()).ok())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn validate_records_query(input: RecordsQueryInput) -> AppResult<RecordsQuery> {
    let table = required_field(input.table, "table")?;
    if input.max_records == Some(0) {
        return Err(AppError::Validation(
            "maxRecords must be greater than zero".to_owned(),
        ));
    }

    Ok(RecordsQuery {
        table,
        filter_by_formula: optional_text(input.filter_by_formula),
        max_records: input.max_records,
        view: optional_text(input.view),
    })
}

fn validate_records_create(input: RecordsCreateInput) -> AppResult<RecordsCreate> {
    let table = required_field(input.table, "table")?;
    let records = input.records.unwrap_or_default();
    if records.is_empty() {
        return Err(AppError::Validation(
            "records must contain at least one row".to_owned(),
        ));
    }

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| row_fields(index, record))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(RecordsCreate { table, rows })
}

fn row_fields(index: usize, record: Value) -> AppResult<Map<String, Value>> {
    match record {
        Value::Object(mut row) => match row.remove("fields") {
            Some(Value::Object(fields)) => Ok(fields),
            _ => Err(AppError::Validation(format!(
                "records[{index}].fields must be an object"
            ))),
        },
        _ => Err(AppError::Validation(format!(
            "records[{index}] must be an object"
        ))),
    }
}

fn validate_workflow_execution(input: WorkflowExecuteInput) -> AppResult<WorkflowExecution> {
    let workflow_id = input
        .workflow_id
        .map(|value| value.trim().trim_matches('/').to_owned());
    let workflow_id = required_field(workflow_id, "workflowId")?;

    Ok(WorkflowExecution {
        workflow_id,
        payload: input
            .payload
            .filter(|payload| !payload.is_null())
            .unwrap_or_else(|| Value::Object(Map::new())),
    })
}
