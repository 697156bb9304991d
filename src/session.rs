//! Session descriptor injected into the service.

/// Base address of the studio plus the session identifier sent with every
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    studio_address: String,
    psdevslnsys: String,
}

impl Session {
    /// Create a session. A trailing `/` on the address is dropped so URLs
    /// can be joined with a leading `/`.
    pub fn new(studio_address: impl Into<String>, psdevslnsys: impl Into<String>) -> Self {
        let studio_address = studio_address.into();
        Self {
            studio_address: studio_address.trim_end_matches('/').to_string(),
            psdevslnsys: psdevslnsys.into(),
        }
    }

    pub fn studio_address(&self) -> &str {
        &self.studio_address
    }

    pub fn psdevslnsys(&self) -> &str {
        &self.psdevslnsys
    }
}
