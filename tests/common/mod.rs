#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use dian_edi::models::Invoice;
use dian_edi::state::AppState;
use serde_json::{json, Value};
use shared::config::{AppConfig, HttpConfig};
use shared::{CompanyConfig, Config};
use std::sync::Arc;
use dian_edi::domains::resolutions::InMemoryResolutionStore;

pub const TEST_SET_ID: &str = "f3e2d1c4-test-set";
pub const TOKEN: &str = "secret-token";

pub fn company(api_url: &str) -> CompanyConfig {
    let mut company = CompanyConfig::new(api_url, TOKEN);
    company.test_set_id = Some(TEST_SET_ID.to_string());
    company
}

pub fn config(company: CompanyConfig) -> Config {
    Config {
        company,
        http: HttpConfig {
            request_timeout_seconds: 5,
        },
        app: AppConfig {
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            port: 0,
        },
    }
}

pub fn app_state(company: CompanyConfig) -> Arc<AppState> {
    Arc::new(AppState::with_parts(
        config(company),
        reqwest::Client::new(),
        Arc::new(InMemoryResolutionStore::new()),
    ))
}

/// Invoice as the ERP sends it: one line, 1 × 100000 with 19% VAT.
pub fn invoice_json() -> Value {
    json!({
        "id": 1,
        "move_type": "out_invoice",
        "state": "draft",
        "number": "SETP990000001",
        "origin": null,
        "reference": null,
        "name": null,
        "comment": null,
        "date_invoice": "2021-03-01",
        "date_due": "2021-03-31",
        "rate_date": null,
        "partner": {
            "id": 7,
            "name": "Comercializadora Andina S.A.S.",
            "is_company": true,
            "vat": "900.123.456-7",
            "document_type": "rut",
            "email": "gerencia@andina.co",
            "email_edi": "facturas@andina.co",
            "phone": "+57 300 123 4567",
            "street": "Calle 10 # 20-30",
            "trade_name": null,
            "merchant_registration": null,
            "municipality_id": 149,
            "type_regime_id": 2,
            "type_liability_id": 14,
            "parent": null
        },
        "lines": [{
            "description": "Servicio de consultoría",
            "product": { "id": 1, "code": "SRV-01", "edi_unit_measure_id": 70, "uom_edi_unit_measure_id": null },
            "quantity": "1",
            "price_unit": "100000",
            "discount": "0",
            "price_subtotal": "100000",
            "taxes": [{
                "id": 1,
                "name": "IVA 19%",
                "amount_type": "percent",
                "amount": "19",
                "edi_tax": { "id": 1, "name": "IVA" }
            }],
            "account_id": 4135
        }],
        "journal": { "invoice": 12, "credit_note": 13, "debit_note": 14 },
        "correction_concept_credit_id": null,
        "correction_concept_debit_id": null,
        "origin_invoice": null
    })
}

pub fn invoice() -> Invoice {
    serde_json::from_value(invoice_json()).expect("invoice fixture")
}

/// Credit note against `SETP990000001`.
pub fn credit_note(concept: Option<i64>) -> Invoice {
    let mut note = invoice();
    note.id = 2;
    note.move_type = dian_edi::models::MoveType::OutRefund;
    note.number = Some("NC-000045".to_string());
    note.origin = Some("SETP990000001".to_string());
    note.correction_concept_credit_id = concept;
    note.origin_invoice = Some(dian_edi::models::OriginInvoice {
        number: "SETP990000001".to_string(),
        uuid: Some("cufe-990000001".to_string()),
        issue_date: Some("2021-03-01".to_string()),
    });
    note
}

pub fn attached_document(number: &str) -> String {
    STANDARD.encode(format!(
        "<?xml version=\"1.0\"?>\n<AttachedDocument>\n<cbc:ParentDocumentID>{}</cbc:ParentDocumentID>\n</AttachedDocument>",
        number
    ))
}

/// Accepted answer, attached document included.
pub fn accepted(uuid: &str, number: &str) -> Value {
    json!({
        "is_valid": true,
        "algorithm": "CUFE-SHA384",
        "uuid": uuid,
        "issue_date": "2021-03-01 10:15:00",
        "zip_key": null,
        "status_code": "00",
        "status_description": "Procesado Correctamente.",
        "status_message": format!("La Factura electrónica {}, ha sido autorizada.", number),
        "xml_name": "fv09001234560002100000001.xml",
        "zip_name": "z09001234560002100000001.zip",
        "errors_messages": [],
        "qr_data": format!("NumFac: {}\nValTolFac: 119000.00\nCUFE: {}", number, uuid),
        "signature": "c2lnbmF0dXJl",
        "xml_base64_bytes": "PHhtbC8+",
        "application_response_base64_bytes": "PHhtbC8+",
        "attached_document_base64_bytes": attached_document(number),
        "pdf_base64_bytes": "JVBERi0=",
        "zip_base64_bytes": "UEsDBA=="
    })
}

/// Answer of the enablement environment: not valid, UUID assigned.
pub fn sent_to_test_set(uuid: &str) -> Value {
    json!({
        "is_valid": false,
        "uuid": uuid,
        "zip_key": "b4a9e7c2-zip-key",
        "status_code": null,
        "errors_messages": [],
        "qr_data": format!("CUFE: {}", uuid)
    })
}

pub fn rejected(uuid: &str) -> Value {
    json!({
        "is_valid": false,
        "uuid": uuid,
        "status_code": "99",
        "status_description": "Validación contiene errores en campos mandatorios.",
        "status_message": "Documento con errores en campos mandatorios.",
        "errors_messages": ["Regla: FAD06, Rechazo: Valor del CUFE no calculado correctamente"]
    })
}
