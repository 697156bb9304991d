//! URL builders for the MosDynamic endpoints.

/// URL-encode an application id for use as a single path segment.
pub fn encode_app_id(app: &str) -> String {
    urlencoding::encode(app).into_owned()
}

/// Build URL for fetching application data
pub fn build_app_data_url(base: &str) -> String {
    format!("{}/MosDynamic/appdata", base.trim_end_matches('/'))
}

/// Build URL for listing background tasks
pub fn build_fetch_tasks_url(base: &str) -> String {
    format!(
        "{}/MosDynamic/pssysdevbktasks/fetchdefault",
        base.trim_end_matches('/')
    )
}

/// Build URL for cancelling every background task.
///
/// The server addresses the collection with a literal `null` key.
pub fn build_cancel_all_url(base: &str) -> String {
    format!(
        "{}/MosDynamic/pssysdevbktasks/null/cancelalltask",
        base.trim_end_matches('/')
    )
}

/// Build URL for refreshing an application's publish cache
pub fn build_refresh_app_url(base: &str, app: &str) -> String {
    format!(
        "{}/MosDynamic/pssysapps/{}",
        base.trim_end_matches('/'),
        encode_app_id(app)
    )
}
