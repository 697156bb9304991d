pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;
pub mod urls;

pub use config::StudioConfig;
pub use error::{ConfigError, ServiceApiError};
pub use report::{ErrorSink, TracingErrorSink};
pub use services::ServiceApiService;
pub use session::Session;
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
pub use types::{not_nil_empty, PsData, TaskState};
