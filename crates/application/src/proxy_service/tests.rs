use std::sync::Arc;

use async_trait::async_trait;
use galley_core::{AppError, AppResult, UserId, VerifiedUser};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{
    RecordsCreate, RecordsCreateInput, RecordsGateway, RecordsQuery, RecordsQueryInput,
    WorkflowExecuteInput, WorkflowExecution, WorkflowGateway,
};

use super::ProxyService;

#[derive(Default)]
struct RecordingRecordsGateway {
    queries: Mutex<Vec<RecordsQuery>>,
    creates: Mutex<Vec<RecordsCreate>>,
}

#[async_trait]
impl RecordsGateway for RecordingRecordsGateway {
    async fn query_records(&self, query: &RecordsQuery) -> AppResult<Value> {
        self.queries.lock().await.push(query.clone());
        Ok(json!({"records": []}))
    }

    async fn create_records(&self, request: &RecordsCreate) -> AppResult<Value> {
        self.creates.lock().await.push(request.clone());
        Ok(json!({"records": [{"id": "rec1"}]}))
    }
}

#[derive(Default)]
struct RecordingWorkflowGateway {
    executions: Mutex<Vec<WorkflowExecution>>,
}

#[async_trait]
impl WorkflowGateway for RecordingWorkflowGateway {
    async fn execute_workflow(&self, execution: &WorkflowExecution) -> AppResult<Value> {
        self.executions.lock().await.push(execution.clone());
        Ok(json!({"executionId": "exec-1"}))
    }
}

fn caller() -> VerifiedUser {
    match UserId::new("u1") {
        Ok(user_id) => VerifiedUser::new(user_id, Some("cook@example.com".to_owned())),
        Err(error) => panic!("invalid test user id: {error}"),
    }
}

fn configured() -> (
    ProxyService,
    Arc<RecordingRecordsGateway>,
    Arc<RecordingWorkflowGateway>,
) {
    let records = Arc::new(RecordingRecordsGateway::default());
    let workflows = Arc::new(RecordingWorkflowGateway::default());
    (
        ProxyService::new(Some(records.clone()), Some(workflows.clone())),
        records,
        workflows,
    )
}

fn validation_message(result: AppResult<Value>) -> String {
    match result {
        Err(AppError::Validation(message)) => message,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn records_query_forwards_validated_parameters() {
    let (service, records, _) = configured();

    let result = service
        .records_query(
            &caller(),
            RecordsQueryInput {
                table: Some(" Inventory ".to_owned()),
                filter_by_formula: Some("{Status}='Low'".to_owned()),
                max_records: Some(20),
                view: Some("   ".to_owned()),
            },
        )
        .await;

    assert!(result.is_ok());
    let queries = records.queries.lock().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].table.as_str(), "Inventory");
    assert_eq!(queries[0].max_records, Some(20));
    assert_eq!(queries[0].view, None);
}

#[tokio::test]
async fn records_query_requires_table_and_positive_limit() {
    let (service, records, _) = configured();

    let missing = service
        .records_query(&caller(), RecordsQueryInput::default())
        .await;
    assert_eq!(validation_message(missing), "table is required");

    let zero = service
        .records_query(
            &caller(),
            RecordsQueryInput {
                table: Some("Inventory".to_owned()),
                max_records: Some(0),
                ..RecordsQueryInput::default()
            },
        )
        .await;
    assert!(validation_message(zero).contains("maxRecords"));
    assert!(records.queries.lock().await.is_empty());
}

#[tokio::test]
async fn records_create_without_table_never_reaches_vendor() {
    let (service, records, _) = configured();

    let result = service
        .records_create(
            &caller(),
            RecordsCreateInput {
                table: None,
                records: Some(vec![json!({"fields": {"Item": "Flour"}})]),
            },
        )
        .await;

    assert_eq!(validation_message(result), "table is required");
    assert!(records.creates.lock().await.is_empty());
}

#[tokio::test]
async fn records_create_requires_rows_with_field_objects() {
    let (service, records, _) = configured();

    let empty = service
        .records_create(
            &caller(),
            RecordsCreateInput {
                table: Some("Waste Log".to_owned()),
                records: Some(Vec::new()),
            },
        )
        .await;
    assert_eq!(
        validation_message(empty),
        "records must contain at least one row"
    );

    let malformed = service
        .records_create(
            &caller(),
            RecordsCreateInput {
                table: Some("Waste Log".to_owned()),
                records: Some(vec![json!({"fields": {"Item": "Eggs"}}), json!({"Item": "Milk"})]),
            },
        )
        .await;
    assert_eq!(
        validation_message(malformed),
        "records[1].fields must be an object"
    );
    assert!(records.creates.lock().await.is_empty());
}

#[tokio::test]
async fn records_create_forwards_field_maps() {
    let (service, records, _) = configured();

    let result = service
        .records_create(
            &caller(),
            RecordsCreateInput {
                table: Some("Waste Log".to_owned()),
                records: Some(vec![json!({"fields": {"Item": "Eggs", "Qty": 12}})]),
            },
        )
        .await;

    assert!(result.is_ok());
    let creates = records.creates.lock().await;
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].rows[0].get("Qty"), Some(&json!(12)));
}

#[tokio::test]
async fn workflow_execute_normalizes_id_and_payload() {
    let (service, _, workflows) = configured();

    let result = service
        .workflow_execute(
            &caller(),
            WorkflowExecuteInput {
                workflow_id: Some("/daily-close/".to_owned()),
                payload: None,
            },
        )
        .await;

    assert!(result.is_ok());
    let executions = workflows.executions.lock().await;
    assert_eq!(executions[0].workflow_id.as_str(), "daily-close");
    assert_eq!(executions[0].payload, json!({}));
}

#[tokio::test]
async fn workflow_execute_requires_identifier() {
    let (service, _, workflows) = configured();

    let result = service
        .workflow_execute(
            &caller(),
            WorkflowExecuteInput {
                workflow_id: Some(" / ".to_owned()),
                payload: Some(json!({"shift": "am"})),
            },
        )
        .await;

    assert_eq!(validation_message(result), "workflowId is required");
    assert!(workflows.executions.lock().await.is_empty());
}

#[tokio::test]
async fn unconfigured_vendors_report_configuration_errors() {
    let service = ProxyService::new(None, None);

    let records = service
        .records_query(
            &caller(),
            RecordsQueryInput {
                table: Some("Inventory".to_owned()),
                ..RecordsQueryInput::default()
            },
        )
        .await;
    assert!(matches!(records, Err(AppError::Configuration(_))));

    let workflow = service
        .workflow_execute(
            &caller(),
            WorkflowExecuteInput {
                workflow_id: Some("daily-close".to_owned()),
                payload: None,
            },
        )
        .await;
    assert!(matches!(workflow, Err(AppError::Configuration(_))));
}

#[tokio::test]
async fn validation_runs_before_configuration_check() {
    let service = ProxyService::new(None, None);

    let result = service
        .records_create(&caller(), RecordsCreateInput::default())
        .await;

    assert_eq!(validation_message(result), "table is required");
}
