//! MosDynamic studio service.
//!
//! Wraps four studio endpoints: application data, running background tasks,
//! cancel-all, and publish-cache refresh. Each call is one round trip.
//!
//! Every operation comes in two forms. The `try_*` methods return a
//! [`ServiceApiError`] on failure. The plain methods report the error to the
//! configured [`ErrorSink`] once and fall back to an empty value.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ServiceApiError;
use crate::report::{ErrorSink, TracingErrorSink};
use crate::session::Session;
use crate::transport::{
    HttpTransport, Transport, TransportRequest, TransportResponse, CONTENT_TYPE_JSON,
};
use crate::types::{json_kind, not_nil_empty, PsData, TaskState};
use crate::urls::{
    build_app_data_url, build_cancel_all_url, build_fetch_tasks_url, build_refresh_app_url,
};

/// Session header / query key understood by the studio.
pub const SESSION_KEY: &str = "psdevslnsys";

/// Fixed page size for the task listing. Only the first page is fetched.
pub const TASK_PAGE_SIZE: u32 = 100;

/// Client for the MosDynamic studio endpoints.
#[derive(Clone)]
pub struct ServiceApiService {
    session: Session,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn ErrorSink>,
}

impl std::fmt::Debug for ServiceApiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceApiService")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ServiceApiService {
    /// Create a service over the given transport. Errors swallowed by the
    /// defaulting methods are logged through `tracing`.
    pub fn new(session: Session, transport: Arc<dyn Transport>) -> Self {
        Self {
            session,
            transport,
            sink: Arc::new(TracingErrorSink),
        }
    }

    /// Create a service using a default reqwest client.
    pub fn with_http(session: Session) -> Self {
        Self::new(session, Arc::new(HttpTransport::new()))
    }

    /// Replace the sink that receives swallowed errors.
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn session_headers(&self, request: TransportRequest) -> TransportRequest {
        request
            .header("content-type", CONTENT_TYPE_JSON)
            .header(SESSION_KEY, self.session.psdevslnsys())
    }

    fn or_default<T: Default>(
        &self,
        operation: &'static str,
        result: Result<T, ServiceApiError>,
    ) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                self.sink.report(operation, &e);
                T::default()
            }
        }
    }

    // --- Application data ---

    /// Fetch the studio's application data.
    ///
    /// Returns an empty record when the server answers without a body.
    pub async fn try_get_app_data(&self) -> Result<PsData, ServiceApiError> {
        let request = TransportRequest::get(build_app_data_url(self.session.studio_address()))
            .query(SESSION_KEY, self.session.psdevslnsys())
            .header("content-type", CONTENT_TYPE_JSON);

        let resp = self.transport.send(request).await?;
        if !resp.status.is_success() {
            return Err(unexpected_status(&resp));
        }

        match resp.body {
            None | Some(Value::Null) => Ok(PsData::new()),
            Some(Value::Object(data)) => Ok(data),
            Some(other) => Err(ServiceApiError::UnexpectedBody {
                expected: "object",
                found: json_kind(&other),
            }),
        }
    }

    /// Like [`Self::try_get_app_data`], but reports any error once and
    /// returns an empty record.
    pub async fn get_app_data(&self) -> PsData {
        self.or_default("get_app_data", self.try_get_app_data().await)
    }

    // --- Background tasks ---

    /// List queued and running background tasks.
    ///
    /// Only the first page of [`TASK_PAGE_SIZE`] tasks is requested.
    pub async fn try_get_system_run(&self) -> Result<Vec<PsData>, ServiceApiError> {
        let request = TransportRequest::get(build_fetch_tasks_url(self.session.studio_address()))
            .query("psdevslnsysid", self.session.psdevslnsys())
            .query("n_taskstate_in", TaskState::filter(&TaskState::ACTIVE))
            .query("size", TASK_PAGE_SIZE)
            .query("page", 0);
        let request = self.session_headers(request);

        let resp = self.transport.send(request).await?;
        if !resp.is_ok() {
            return Err(unexpected_status(&resp));
        }

        match resp.body {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(task) => Ok(task),
                    other => Err(ServiceApiError::UnexpectedBody {
                        expected: "array of objects",
                        found: json_kind(&other),
                    }),
                })
                .collect(),
            Some(other) => Err(ServiceApiError::UnexpectedBody {
                expected: "array",
                found: json_kind(&other),
            }),
        }
    }

    /// Like [`Self::try_get_system_run`], but reports any error once and
    /// returns no tasks.
    pub async fn get_system_run(&self) -> Vec<PsData> {
        self.or_default("get_system_run", self.try_get_system_run().await)
    }

    /// Cancel background tasks.
    ///
    /// The studio only exposes cancel-all, so `keys` is not sent: every task
    /// for the session is cancelled regardless of which keys are passed.
    pub async fn try_cancel_system_run<S: AsRef<str>>(
        &self,
        keys: &[S],
    ) -> Result<bool, ServiceApiError> {
        if !keys.is_empty() {
            debug!(
                "cancel_system_run ignoring {} task keys ({}); cancelling all tasks",
                keys.len(),
                keys.iter().map(|k| k.as_ref()).collect::<Vec<&str>>().join(", ")
            );
        }

        let request = self.session_headers(TransportRequest::post(build_cancel_all_url(
            self.session.studio_address(),
        )));

        let resp = self.transport.send(request).await?;
        if !resp.is_ok() {
            return Err(unexpected_status(&resp));
        }

        match resp.body {
            Some(Value::Bool(cancelled)) => {
                info!("Cancel-all request accepted (cancelled: {})", cancelled);
                Ok(cancelled)
            }
            None | Some(Value::Null) => {
                debug!("Cancel-all request answered without a body");
                Ok(false)
            }
            Some(other) => Err(ServiceApiError::UnexpectedBody {
                expected: "boolean",
                found: json_kind(&other),
            }),
        }
    }

    /// Like [`Self::try_cancel_system_run`], but reports any error once and
    /// returns `false`.
    pub async fn cancel_system_run<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        self.or_default("cancel_system_run", self.try_cancel_system_run(keys).await)
    }

    // --- Publish cache ---

    /// Refresh the publish cache of application `app`.
    ///
    /// Succeeds only when the studio answers 200 with a non-empty
    /// `pssysappid`; a 200 without one yields `Ok(false)`.
    pub async fn try_refresh_app_cache(&self, app: &str) -> Result<bool, ServiceApiError> {
        let request = TransportRequest::put(build_refresh_app_url(
            self.session.studio_address(),
            app,
        ))
        .json(json!({}));
        let request = self.session_headers(request);

        let resp = self.transport.send(request).await?;
        if !resp.is_ok() {
            return Err(unexpected_status(&resp));
        }

        let refreshed = match &resp.body {
            Some(Value::Object(data)) => not_nil_empty(data.get("pssysappid")),
            _ => false,
        };
        if refreshed {
            info!("Refreshed publish cache for app {}", app);
        } else {
            debug!("Refresh of app {} returned no pssysappid", app);
        }
        Ok(refreshed)
    }

    /// Like [`Self::try_refresh_app_cache`], but reports any error once and
    /// returns `false`.
    pub async fn refresh_app_cache(&self, app: &str) -> bool {
        self.or_default("refresh_app_cache", self.try_refresh_app_cache(app).await)
    }
}

fn unexpected_status(resp: &TransportResponse) -> ServiceApiError {
    ServiceApiError::UnexpectedStatus {
        status: resp.status,
        body: resp.body_text(),
    }
}
