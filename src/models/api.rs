//! Wire types exchanged with the remote invoicing API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accepts strings, numbers and booleans; the API is not consistent about them.
fn lossy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// `null`, `0` and `""` read as false; `1`, `"1"` and `"true"` as true.
fn lossy_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"),
        Some(_) => false,
    })
}

/// Outcome of a submission or a status query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentResponse {
    #[serde(deserialize_with = "lossy_bool")]
    pub is_valid: bool,
    #[serde(deserialize_with = "lossy_string")]
    pub algorithm: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub uuid: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub issue_date: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub zip_key: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub status_code: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub status_description: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub status_message: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub xml_name: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub zip_name: Option<String>,
    pub errors_messages: Value,
    #[serde(deserialize_with = "lossy_string")]
    pub qr_data: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub signature: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub xml_base64_bytes: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub application_response_base64_bytes: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub attached_document_base64_bytes: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub pdf_base64_bytes: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub zip_base64_bytes: Option<String>,
}

impl DocumentResponse {
    pub fn has_uuid(&self) -> bool {
        self.uuid.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// `errors_messages` flattened to text, `None` when empty.
    pub fn errors_text(&self) -> Option<String> {
        match &self.errors_messages {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Value::Object(map) if map.is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

/// One entry of `/logs/{uuid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLog {
    pub id: i64,
    #[serde(flatten)]
    pub document: DocumentResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentPayload {
    pub type_environment_id: i64,
}

/// `GET /config/environment`; `message` comes alone on errors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnvironmentStatus {
    pub type_environment_id: Option<i64>,
    #[serde(deserialize_with = "lossy_string")]
    pub message: Option<String>,
}

/// Answer to a resolution create/update: `{message, resolution: {id, number, next_consecutive}}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolutionAck {
    #[serde(deserialize_with = "lossy_string")]
    pub message: Option<String>,
    pub resolution: Option<RemoteResolution>,
}

/// Body of `POST|PUT /config/resolution`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionPayload {
    pub type_document_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub resolution_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_key: Option<String>,
    pub from: i64,
    pub to: i64,
    pub date_from: String,
    pub date_to: String,
}

/// Resolution as the API reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteResolution {
    pub id: i64,
    pub type_document_id: i64,
    #[serde(deserialize_with = "lossy_string")]
    pub prefix: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub resolution: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub resolution_date: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub technical_key: Option<String>,
    pub from: i64,
    pub to: i64,
    #[serde(deserialize_with = "lossy_string")]
    pub date_from: Option<String>,
    #[serde(deserialize_with = "lossy_string")]
    pub date_to: Option<String>,
    pub number: Option<i64>,
    #[serde(deserialize_with = "lossy_string")]
    pub next_consecutive: Option<String>,
}
