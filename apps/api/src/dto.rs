mod common;
mod proxy;
mod session;

pub use common::HealthResponse;
pub use proxy::{RecordsCreateRequest, RecordsQueryRequest, WorkflowExecuteRequest};
pub use session::{
    CatalogEntryResponse, GateResponse, ProfileResponse, SessionResponse, SetActiveRequest,
    SetActiveResponse,
};
