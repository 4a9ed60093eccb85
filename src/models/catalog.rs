//! Tablas de códigos DIAN usadas al armar los documentos.
//!
//! Ids are the ones seeded by the remote invoicing API; the payload always
//! carries ids, never DIAN codes.

use serde::{Deserialize, Serialize};

/// Unit code "886" (número de unidades internacionales) used by fixed taxes.
pub const FIXED_TAX_UNIT_MEASURE_ID: i64 = 886;
pub const BASE_UNIT_MEASURE: &str = "1.000000";
/// Estándar de adopción del contribuyente ('999').
pub const ITEM_IDENTIFICATION_STANDARD_ID: i64 = 4;
/// Valor comercial ('01').
pub const REFERENCE_PRICE_COMMERCIAL_ID: i64 = 1;
/// Instrumento no definido.
pub const PAYMENT_METHOD_UNDEFINED_ID: i64 = 1;
pub const DEFAULT_MERCHANT_REGISTRATION: &str = "No tiene";

/// The three document shapes the API accepts from this bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdiDocumentKind {
    Invoice,
    CreditNote,
    DebitNote,
}

impl EdiDocumentKind {
    /// Path segment under `/api/ubl2.1/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            EdiDocumentKind::Invoice => "invoice",
            EdiDocumentKind::CreditNote => "credit-note",
            EdiDocumentKind::DebitNote => "debit-note",
        }
    }

    pub fn dian_code(&self) -> &'static str {
        match self {
            EdiDocumentKind::Invoice => "01",
            EdiDocumentKind::CreditNote => "91",
            EdiDocumentKind::DebitNote => "92",
        }
    }

    pub fn type_document(&self) -> &'static TypeDocument {
        // every kind has a row in TYPE_DOCUMENTS
        TYPE_DOCUMENTS
            .iter()
            .find(|t| t.code == self.dian_code())
            .unwrap_or(&TYPE_DOCUMENTS[0])
    }

    pub fn is_correction(&self) -> bool {
        !matches!(self, EdiDocumentKind::Invoice)
    }
}

impl std::fmt::Display for EdiDocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeDocument {
    pub id: i64,
    pub code: &'static str,
    pub name: &'static str,
}

pub const TYPE_DOCUMENTS: &[TypeDocument] = &[
    TypeDocument { id: 1, code: "01", name: "Factura de Venta Nacional" },
    TypeDocument { id: 2, code: "02", name: "Factura de Exportación" },
    TypeDocument { id: 3, code: "03", name: "Factura de Contingencia" },
    TypeDocument { id: 4, code: "04", name: "Factura de Contingencia DIAN" },
    TypeDocument { id: 5, code: "91", name: "Nota Crédito" },
    TypeDocument { id: 6, code: "92", name: "Nota Débito" },
];

pub fn type_document_by_id(id: i64) -> Option<&'static TypeDocument> {
    TYPE_DOCUMENTS.iter().find(|t| t.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorrectionConcept {
    pub id: i64,
    pub type_document_id: i64,
    pub code: &'static str,
    pub name: &'static str,
}

pub const CORRECTION_CONCEPTS: &[CorrectionConcept] = &[
    CorrectionConcept { id: 1, type_document_id: 5, code: "1", name: "Devolución de parte de los bienes; no aceptación de partes del servicio" },
    CorrectionConcept { id: 2, type_document_id: 5, code: "2", name: "Anulación de factura electrónica" },
    CorrectionConcept { id: 3, type_document_id: 5, code: "3", name: "Rebaja total aplicada" },
    CorrectionConcept { id: 4, type_document_id: 5, code: "4", name: "Descuento total aplicado" },
    CorrectionConcept { id: 5, type_document_id: 5, code: "5", name: "Rescisión: nulidad por falta de requisitos" },
    CorrectionConcept { id: 6, type_document_id: 5, code: "6", name: "Otros" },
    CorrectionConcept { id: 7, type_document_id: 6, code: "1", name: "Intereses" },
    CorrectionConcept { id: 8, type_document_id: 6, code: "2", name: "Gastos por cobrar" },
    CorrectionConcept { id: 9, type_document_id: 6, code: "3", name: "Cambio del valor" },
    CorrectionConcept { id: 10, type_document_id: 6, code: "4", name: "Otros" },
];

/// Concept `id`, only if it belongs to the document type of `kind`.
pub fn correction_concept_for(kind: EdiDocumentKind, id: i64) -> Option<&'static CorrectionConcept> {
    let type_document_id = kind.type_document().id;
    CORRECTION_CONCEPTS
        .iter()
        .find(|c| c.id == id && c.type_document_id == type_document_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentForm {
    /// Contado
    Cash,
    /// Crédito
    Credit,
}

impl PaymentForm {
    pub fn id(&self) -> i64 {
        match self {
            PaymentForm::Cash => 1,
            PaymentForm::Credit => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeCurrency {
    pub id: i64,
    pub code: &'static str,
}

pub const TYPE_CURRENCIES: &[TypeCurrency] = &[
    TypeCurrency { id: 10, code: "BRL" },
    TypeCurrency { id: 23, code: "CAD" },
    TypeCurrency { id: 31, code: "CLP" },
    TypeCurrency { id: 35, code: "COP" },
    TypeCurrency { id: 47, code: "EUR" },
    TypeCurrency { id: 52, code: "GBP" },
    TypeCurrency { id: 103, code: "MXN" },
    TypeCurrency { id: 121, code: "PEN" },
    TypeCurrency { id: 142, code: "USD" },
];

pub fn currency_by_code(code: &str) -> Option<&'static TypeCurrency> {
    TYPE_CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// DIAN environment pushed to `/config/environment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Test,
}

impl Environment {
    pub fn from_production_flag(is_not_test: bool) -> Self {
        if is_not_test {
            Environment::Production
        } else {
            Environment::Test
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Environment::Production => 1,
            Environment::Test => 2,
        }
    }
}
