use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::catalog::type_document_by_id;

/// Numbering authorization mirrored between the local store and the API.
/// The API owns `resolution_id`, `resolution_number` and `next_consecutive`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub id: i64,
    pub api_sync: bool,
    pub type_document_id: i64,
    pub prefix: Option<String>,
    pub resolution: Option<String>,
    pub resolution_date: Option<NaiveDate>,
    pub technical_key: Option<String>,
    pub from: i64,
    pub to: i64,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub resolution_id: Option<i64>,
    pub resolution_number: Option<i64>,
    pub next_consecutive: Option<String>,
    pub message: Option<String>,
}

impl Resolution {
    pub fn from_input(id: i64, input: ResolutionInput) -> Self {
        Self {
            id,
            api_sync: input.api_sync,
            type_document_id: input.type_document_id,
            prefix: input.prefix,
            resolution: input.resolution,
            resolution_date: input.resolution_date,
            technical_key: input.technical_key,
            from: input.from,
            to: input.to,
            date_from: input.date_from,
            date_to: input.date_to,
            resolution_id: None,
            resolution_number: None,
            next_consecutive: None,
            message: None,
        }
    }

    /// `12 - Factura de Venta Nacional [01]`
    pub fn display_name(&self) -> String {
        let api_id = self
            .resolution_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        match type_document_by_id(self.type_document_id) {
            Some(doc) => format!("{} - {} [{}]", api_id, doc.name, doc.code),
            None => format!("{} - {}", api_id, self.type_document_id),
        }
    }

    pub fn apply(&mut self, patch: &ResolutionPatch) {
        if let Some(v) = patch.api_sync {
            self.api_sync = v;
        }
        if let Some(v) = patch.type_document_id {
            self.type_document_id = v;
        }
        if let Some(v) = &patch.prefix {
            self.prefix = Some(v.clone());
        }
        if let Some(v) = &patch.resolution {
            self.resolution = Some(v.clone());
        }
        if let Some(v) = patch.resolution_date {
            self.resolution_date = Some(v);
        }
        if let Some(v) = &patch.technical_key {
            self.technical_key = Some(v.clone());
        }
        if let Some(v) = patch.from {
            self.from = v;
        }
        if let Some(v) = patch.to {
            self.to = v;
        }
        if let Some(v) = patch.date_from {
            self.date_from = Some(v);
        }
        if let Some(v) = patch.date_to {
            self.date_to = Some(v);
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_input_range"))]
pub struct ResolutionInput {
    #[serde(default = "default_true")]
    pub api_sync: bool,
    #[validate(range(min = 1))]
    pub type_document_id: i64,
    #[validate(length(max = 4))]
    pub prefix: Option<String>,
    pub resolution: Option<String>,
    pub resolution_date: Option<NaiveDate>,
    pub technical_key: Option<String>,
    #[validate(range(min = 0))]
    pub from: i64,
    #[validate(range(min = 0))]
    pub to: i64,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

fn validate_input_range(input: &ResolutionInput) -> Result<(), ValidationError> {
    if input.from > input.to {
        return Err(ValidationError::new("from_greater_than_to"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ResolutionPatch {
    pub api_sync: Option<bool>,
    #[validate(range(min = 1))]
    pub type_document_id: Option<i64>,
    #[validate(length(max = 4))]
    pub prefix: Option<String>,
    pub resolution: Option<String>,
    pub resolution_date: Option<NaiveDate>,
    pub technical_key: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}
