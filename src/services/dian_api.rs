// ============================================================================
// DIAN API CLIENT - Cliente de la API de facturación electrónica (UBL 2.1)
// ============================================================================

use serde_json::{json, Value};
use shared::{AppError, CompanyConfig, Result, ServiceClient};
use tracing::{debug, info};

use crate::domains::edi::DocumentRequest;
use crate::models::{
    DocumentLog, DocumentResponse, EdiDocumentKind, Environment, EnvironmentPayload, EnvironmentStatus,
    RemoteResolution, ResolutionAck, ResolutionPayload,
};

pub const API_PREFIX: &str = "/api/ubl2.1";
pub const SERVICE_NAME: &str = "dian-api";

pub const AUTH_ERROR: &str =
    "Error de autenticación con la API de facturación electrónica. Verifique que sus credenciales sean validas";
pub const RESOLUTION_DELETED: &str = "Resolución eliminada con éxito";

/// Thin typed layer over the remote API. No retries: every failure goes
/// straight back to the caller.
#[derive(Debug, Clone)]
pub struct DianApiClient {
    client: ServiceClient,
}

impl DianApiClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn from_company(company: &CompanyConfig, timeout_seconds: u64) -> Result<Self> {
        let client = ServiceClient::new(company.base_url()?, SERVICE_NAME, company.token()?, timeout_seconds)?;
        Ok(Self::new(client))
    }

    /// Shares a pooled reqwest client across requests.
    pub fn with_http_client(http: reqwest::Client, company: &CompanyConfig) -> Result<Self> {
        let client = ServiceClient::with_client(http, company.base_url()?, SERVICE_NAME, company.token()?);
        Ok(Self::new(client))
    }

    pub fn submit_path(kind: EdiDocumentKind, test_set_id: Option<&str>) -> String {
        match test_set_id {
            Some(test_set_id) => format!("{}/{}/{}", API_PREFIX, kind.path_segment(), test_set_id),
            None => format!("{}/{}", API_PREFIX, kind.path_segment()),
        }
    }

    /// `POST /api/ubl2.1/{kind}[/{test_set_id}]`
    pub async fn submit_document(
        &self,
        kind: EdiDocumentKind,
        request: &DocumentRequest,
        test_set_id: Option<&str>,
    ) -> Result<DocumentResponse> {
        let path = Self::submit_path(kind, test_set_id);
        info!("Enviando {} número {} a {}", kind, request.number, path);
        let response = self.client.post(&path, request).await?;
        triage_document(response)
    }

    pub async fn document_status(&self, uuid: &str) -> Result<DocumentResponse> {
        let path = format!("{}/status/document/{}", API_PREFIX, uuid);
        let response = self.client.post(&path, &json!({ "refresh_pdf": true })).await?;
        triage_document(response)
    }

    pub async fn document_logs(&self, uuid: &str) -> Result<Vec<DocumentLog>> {
        let path = format!("{}/logs/{}", API_PREFIX, uuid);
        let response = self.client.post(&path, &json!({})).await?;
        if let Some(err) = message_error(&response) {
            return Err(err);
        }
        match response {
            Value::Array(_) => Ok(serde_json::from_value(response)?),
            other => Err(AppError::protocol(format!(
                "No se ha podido consultar el documento: {}",
                other
            ))),
        }
    }

    pub async fn put_environment(&self, environment: Environment) -> Result<Option<String>> {
        let path = format!("{}/config/environment", API_PREFIX);
        let payload = EnvironmentPayload {
            type_environment_id: environment.id(),
        };
        let response = self.client.put(&path, &payload).await?;
        let status: EnvironmentStatus = serde_json::from_value(response)?;
        Ok(status.message)
    }

    pub async fn get_environment(&self) -> Result<EnvironmentStatus> {
        let path = format!("{}/config/environment", API_PREFIX);
        let response = self.client.get(&path).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Returns the API's view of the resolution plus its message.
    pub async fn create_resolution(&self, payload: &ResolutionPayload) -> Result<(RemoteResolution, Option<String>)> {
        let path = format!("{}/config/resolution", API_PREFIX);
        debug!("Request create resolution DIAN: {:?}", payload);
        let response = self.client.post(&path, payload).await?;
        resolution_ack(response)
    }

    pub async fn update_resolution(
        &self,
        resolution_id: i64,
        payload: &ResolutionPayload,
    ) -> Result<(RemoteResolution, Option<String>)> {
        let path = format!("{}/config/resolution/{}", API_PREFIX, resolution_id);
        debug!("Request update resolution DIAN: {:?}", payload);
        let response = self.client.put(&path, payload).await?;
        resolution_ack(response)
    }

    pub async fn delete_resolution(&self, resolution_id: i64) -> Result<()> {
        let path = format!("{}/config/resolution/{}", API_PREFIX, resolution_id);
        let response = self.client.delete(&path).await?;
        match response.get("message").and_then(Value::as_str) {
            Some(RESOLUTION_DELETED) => Ok(()),
            Some("Unauthenticated.") | Some("") => Err(AppError::authentication(AUTH_ERROR)),
            Some(message) => Err(AppError::external_service(SERVICE_NAME, message)),
            None => Err(AppError::protocol("Algo sucede. No es posible comunicarse con la API")),
        }
    }

    pub async fn list_resolutions(&self) -> Result<Vec<RemoteResolution>> {
        let path = format!("{}/config/resolutions", API_PREFIX);
        let response = self.client.get(&path).await?;
        if let Some(err) = message_error(&response) {
            return Err(err);
        }
        match response {
            Value::Array(_) => Ok(serde_json::from_value(response)?),
            _ => Err(AppError::protocol("No se ha obtenido una respuesta logica por parte de la API")),
        }
    }
}

/// Error carried by a `{"message": ...}` answer, if that is what `response` is.
fn message_error(response: &Value) -> Option<AppError> {
    let message = response.get("message")?;
    let text = message.as_str().unwrap_or_default();
    if text.is_empty() || text == "Unauthenticated." {
        return Some(AppError::authentication(AUTH_ERROR));
    }
    Some(match response.get("errors") {
        Some(errors) => AppError::external_service(SERVICE_NAME, format!("{}/ errors: {}", text, errors)),
        None => AppError::external_service(SERVICE_NAME, text),
    })
}

/// Classifies a document submission or status answer.
pub fn triage_document(response: Value) -> Result<DocumentResponse> {
    if let Some(err) = message_error(&response) {
        return Err(err);
    }
    if response.get("is_valid").is_some() {
        return Ok(serde_json::from_value(response)?);
    }
    Err(AppError::protocol("No se ha obtenido una respuesta logica por parte de la API"))
}

fn resolution_ack(response: Value) -> Result<(RemoteResolution, Option<String>)> {
    let ack: ResolutionAck = serde_json::from_value(response)?;
    if let Some(resolution) = ack.resolution {
        return Ok((resolution, ack.message));
    }
    match ack.message.as_deref() {
        Some("Unauthenticated.") => Err(AppError::authentication(
            "No es posible la autenticación con la API. Revise su Api key e intente nuevamente.",
        )),
        Some(message) => Err(AppError::external_service(SERVICE_NAME, message)),
        None => Err(AppError::protocol("Algo sucede. No es posible comunicarse con la API")),
    }
}
