use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct NotePayload {
    pub note: Option<String>,
}

impl NotePayload {
    /// The trimmed note text; blank notes are rejected.
    pub fn text(&self) -> Result<String> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::BadRequest("Note is required".to_string()))
    }
}
