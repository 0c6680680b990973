//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod proxy_ports;
mod proxy_service;
mod session_registry;
mod session_resolver;
mod token_verification_service;

pub use access_ports::{
    AccessCatalogRepository, PreferenceKey, PreferenceStore, ProfileRepository,
};
pub use access_service::AccessService;
pub use proxy_ports::{
    IdentityVerifier, RecordsCreate, RecordsCreateInput, RecordsGateway, RecordsQuery,
    RecordsQueryInput, WorkflowExecuteInput, WorkflowExecution, WorkflowGateway,
};
pub use proxy_service::ProxyService;
pub use session_registry::SessionRegistry;
pub use session_resolver::{
    AccessContext, AuthenticatedSession, SessionPhase, SessionResolver, SessionSnapshot,
};
pub use token_verification_service::{TokenVerificationService, parse_bearer_token};
