use galley_application::{RecordsCreateInput, RecordsQueryInput, WorkflowExecuteInput};
use serde::Deserialize;
use serde_json::Value;
use ts_rs::TS;

/// Incoming payload for a records query.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/records-query-request.ts"
)]
pub struct RecordsQueryRequest {
    pub table: Option<String>,
    #[serde(rename = "filterByFormula", alias = "filter_by_formula")]
    pub filter_by_formula: Option<String>,
    #[serde(rename = "maxRecords", alias = "max_records")]
    pub max_records: Option<u32>,
    pub view: Option<String>,
}

impl From<RecordsQueryRequest> for RecordsQueryInput {
    fn from(value: RecordsQueryRequest) -> Self {
        Self {
            table: value.table,
            filter_by_formula: value.filter_by_formula,
            max_records: value.max_records,
            view: value.view,
        }
    }
}

/// Incoming payload for a records create.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/records-create-request.ts"
)]
pub struct RecordsCreateRequest {
    pub table: Option<String>,
    #[ts(type = "Array<{ fields: Record<string, unknown> }> | null")]
    pub records: Option<Vec<Value>>,
}

impl From<RecordsCreateRequest> for RecordsCreateInput {
    fn from(value: RecordsCreateRequest) -> Self {
        Self {
            table: value.table,
            records: value.records,
        }
    }
}

/// Incoming payload for a workflow execution.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/workflow-execute-request.ts"
)]
pub struct WorkflowExecuteRequest {
    #[serde(rename = "workflowId", alias = "webhookPath")]
    pub workflow_id: Option<String>,
    #[serde(alias = "payload")]
    #[ts(type = "unknown")]
    pub data: Option<Value>,
}

impl From<WorkflowExecuteRequest> for WorkflowExecuteInput {
    fn from(value: WorkflowExecuteRequest) -> Self {
        Self {
            workflow_id: value.workflow_id,
            payload: value.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use galley_application::WorkflowExecuteInput;
    use serde_json::json;

    use super::{RecordsQueryRequest, WorkflowExecuteRequest};

    #[test]
    fn records_query_accepts_camel_case_fields() {
        let request = serde_json::from_value::<RecordsQueryRequest>(json!({
            "table": "Inventory",
            "filterByFormula": "{Qty} < 3",
            "maxRecords": 10
        }));

        let request = request.unwrap_or_default();
        assert_eq!(request.table.as_deref(), Some("Inventory"));
        assert_eq!(request.filter_by_formula.as_deref(), Some("{Qty} < 3"));
        assert_eq!(request.max_records, Some(10));
    }

    #[test]
    fn workflow_request_accepts_alternate_names() {
        let request = serde_json::from_value::<WorkflowExecuteRequest>(json!({
            "webhookPath": "daily-close",
            "payload": {"shift": "am"}
        }));

        let input = WorkflowExecuteInput::from(request.unwrap_or_default());
        assert_eq!(input.workflow_id.as_deref(), Some("daily-close"));
        assert_eq!(input.payload, Some(json!({"shift": "am"})));
    }
}
