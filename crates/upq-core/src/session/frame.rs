use serde::Deserialize;

use crate::context::UploadContext;

/// One inbound frame. Both fields are optional and independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFrame {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SessionFrame {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Overwrite the cell of every non-empty field in the frame; absent or
    /// empty fields leave their cell alone. Returns true if anything was written.
    pub fn apply(self, ctx: &UploadContext) -> bool {
        let mut wrote = false;
        if let Some(id) = self.session_id.filter(|s| !s.is_empty()) {
            tracing::debug!(session_id = %id, "session id received");
            ctx.set_session_id(id);
            wrote = true;
        }
        if let Some(status) = self.status.filter(|s| !s.is_empty()) {
            tracing::debug!(status = %status, "status received");
            ctx.set_status(status);
            wrote = true;
        }
        wrote
    }
}

/// Parse and apply one text frame. Malformed frames are logged and dropped.
pub fn handle_text(ctx: &UploadContext, text: &str) -> bool {
    match SessionFrame::parse(text) {
        Ok(frame) => frame.apply(ctx),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed push frame");
            false
        }
    }
}
