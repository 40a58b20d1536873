use serde::{Deserialize, Serialize};

/// The model's cleanliness determination for one image.
///
/// Only `is_clean` is required. The prompt asks for reasons both in
/// `description` and in `issues_detected`, and models answer with either.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanlinessVerdict {
    pub is_clean: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// String, list, or absent depending on the model, so kept as raw JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues_detected: Option<serde_json::Value>,
    /// Any other keys the model returned, in reply order
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CleanlinessVerdict {
    /// 4-space indented JSON. Non-ASCII text is written as-is.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Parse extracted text as a strict JSON verdict.
pub fn parse_verdict(text: &str) -> Result<CleanlinessVerdict, VerdictParseError> {
    serde_json::from_str(text).map_err(|source| VerdictParseError {
        raw: text.to_string(),
        source,
    })
}

/// The extracted text was not a valid verdict.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct VerdictParseError {
    /// Text that failed to parse
    pub raw: String,
    pub source: serde_json::Error,
}
