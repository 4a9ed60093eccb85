mod common;

use dian_edi::domains::edi::workflow::{ENABLEMENT_MESSAGE, MASS_SEND_PRINT_MESSAGE, SUCCESS_MESSAGE};
use dian_edi::domains::edi::{InvoiceWorkflow, NoticeLevel};
use dian_edi::models::InvoiceState;
use serde_json::{json, Value};
use shared::AppError;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn workflow(company: shared::CompanyConfig) -> InvoiceWorkflow {
    InvoiceWorkflow::new(company, reqwest::Client::new())
}

async fn last_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("request recording");
    let request = requests.last().expect("at least one request");
    serde_json::from_slice(&request.body).expect("json body")
}

#[tokio::test]
async fn production_invoice_is_submitted_and_opened() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/invoice"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_partial_json(json!({
            "number": 990000001,
            "type_document_id": 1,
            "resolution_id": 12,
            "customer": { "identification_number": "900123456", "email": "facturas@andina.co" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::accepted("cufe-0001", "SETP990000001")))
        .expect(1)
        .mount(&server)
        .await;

    let mut company = common::company(&server.uri());
    company.is_not_test = true;
    let invoice = common::invoice();

    let processed = workflow(company).open(&invoice).await.unwrap();
    println!("✅ Factura abierta: {:?}", processed.invoice.state);

    assert_eq!(processed.invoice.state, InvoiceState::Open);
    assert!(processed.invoice.edi.is_valid);
    assert!(processed.invoice.edi.is_not_test);
    assert_eq!(processed.invoice.edi.uuid.as_deref(), Some("cufe-0001"));
    assert_eq!(processed.invoice.edi.number.as_deref(), Some("990000001"));
    assert_eq!(processed.invoice.edi.status_code.as_deref(), Some("00"));
    assert!(processed.invoice.edi.qr_image.is_some());
    assert!(processed.invoice.edi.is_attached_document_matched);
    assert!(processed.notices.contains(NoticeLevel::Success, SUCCESS_MESSAGE));
    assert!(!processed.mass_send_print_requested);

    let body = last_body(&server).await;
    let totals = &body["legal_monetary_totals"];
    assert_eq!(totals["line_extension_amount"].as_f64(), Some(100000.0));
    assert_eq!(totals["tax_inclusive_amount"].as_f64(), Some(119000.0));
    assert_eq!(totals["payable_amount"].as_f64(), Some(119000.0));
    let line = &body["invoice_lines"][0];
    assert_eq!(line["tax_totals"][0]["tax_amount"].as_f64(), Some(19000.0));
    assert_eq!(line["tax_totals"][0]["percent"].as_f64(), Some(19.0));
    assert!(body.get("credit_note_lines").is_none());
}

#[tokio::test]
async fn enablement_submission_goes_to_test_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/ubl2.1/invoice/{}", common::TEST_SET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::sent_to_test_set("cufe-test-01")))
        .expect(1)
        .mount(&server)
        .await;

    let processed = workflow(common::company(&server.uri()))
        .open(&common::invoice())
        .await
        .unwrap();

    assert_eq!(processed.invoice.state, InvoiceState::Open);
    assert!(!processed.invoice.edi.is_valid);
    assert_eq!(processed.invoice.edi.uuid.as_deref(), Some("cufe-test-01"));
    assert_eq!(processed.invoice.edi.zip_key.as_deref(), Some("b4a9e7c2-zip-key"));
    assert!(processed.notices.contains(NoticeLevel::Success, ENABLEMENT_MESSAGE));
}

#[tokio::test]
async fn production_rejection_leaves_invoice_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/invoice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::rejected("cufe-bad")))
        .expect(1)
        .mount(&server)
        .await;

    let mut company = common::company(&server.uri());
    company.is_not_test = true;
    let invoice = common::invoice();

    let err = workflow(company).open(&invoice).await.unwrap_err();
    match err {
        AppError::Rejected { details } => {
            assert_eq!(details.status_code.as_deref(), Some("99"));
            assert!(details.errors_messages.unwrap_or_default().contains("FAD06"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(invoice.state, InvoiceState::Draft);
    assert!(invoice.edi.uuid.is_none());
}

#[tokio::test]
async fn credit_note_without_concept_never_reaches_the_api() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = workflow(common::company(&server.uri()))
        .validate(&common::credit_note(None), true)
        .await
        .unwrap_err();
    assert!(err.is_local());
}

#[tokio::test]
async fn credit_note_references_the_origin_invoice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/ubl2.1/credit-note/{}", common::TEST_SET_ID)))
        .and(body_partial_json(json!({
            "number": 45,
            "type_document_id": 5,
            "resolution_id": 13,
            "billing_reference": { "number": "SETP990000001", "uuid": "cufe-990000001" },
            "discrepancy_response": { "correction_concept_id": 2 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::sent_to_test_set("cude-nc-45")))
        .expect(1)
        .mount(&server)
        .await;

    let processed = workflow(common::company(&server.uri()))
        .validate_dian_test(&common::credit_note(Some(2)))
        .await
        .unwrap();
    assert_eq!(processed.invoice.state, InvoiceState::Open);
    assert_eq!(processed.invoice.edi.type_document_id, Some(5));

    let body = last_body(&server).await;
    assert!(body.get("credit_note_lines").is_some());
    assert!(body.get("invoice_lines").is_none());
}

#[tokio::test]
async fn valid_invoice_is_not_resubmitted() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(common::accepted("cufe-0002", "SETP990000001")))
        .expect(0)
        .mount(&server)
        .await;

    let mut invoice = common::invoice();
    invoice.edi.is_valid = true;
    invoice.edi.uuid = Some("cufe-0001".into());

    let processed = workflow(common::company(&server.uri()))
        .validate_dian(&invoice)
        .await
        .unwrap();
    assert_eq!(processed.invoice.edi.uuid.as_deref(), Some("cufe-0001"));
}

#[tokio::test]
async fn missing_attached_document_is_recovered_from_logs() {
    let server = MockServer::start().await;
    let mut without_attachment = common::accepted("cufe-0003", "SETP990000001");
    without_attachment["attached_document_base64_bytes"] = Value::Null;

    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/invoice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(without_attachment))
        .expect(1)
        .mount(&server)
        .await;

    let mut log = common::accepted("cufe-from-log", "SETP990000001");
    log["id"] = json!(31);
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/logs/cufe-0003"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 30, "is_valid": false, "uuid": "cufe-0003" },
            log
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut company = common::company(&server.uri());
    company.is_not_test = true;
    company.enable_mass_send_print = true;

    let processed = workflow(company).open(&common::invoice()).await.unwrap();

    assert!(processed.invoice.has_attached_document());
    assert!(processed.invoice.edi.is_attached_document_matched);
    // the UUID from the submission wins over the log's
    assert_eq!(processed.invoice.edi.uuid.as_deref(), Some("cufe-0003"));
    assert!(processed.notices.contains(NoticeLevel::Info, SUCCESS_MESSAGE));
    assert!(processed.mass_send_print_requested);
    assert!(processed.notices.contains(NoticeLevel::Info, MASS_SEND_PRINT_MESSAGE));
}

#[tokio::test]
async fn status_query_reports_as_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/status/document/cufe-0004"))
        .and(body_partial_json(json!({ "refresh_pdf": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::accepted("cufe-0004", "SETP990000001")))
        .expect(1)
        .mount(&server)
        .await;

    let mut invoice = common::invoice();
    invoice.state = InvoiceState::Open;
    invoice.edi.uuid = Some("cufe-0004".into());

    let processed = workflow(common::company(&server.uri()))
        .refresh_status(&invoice)
        .await
        .unwrap();
    assert!(processed.invoice.edi.is_valid);
    assert!(processed.notices.contains(NoticeLevel::Info, SUCCESS_MESSAGE));
}

#[tokio::test]
async fn logs_errors_become_warnings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/logs/cufe-0005"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthenticated." })))
        .mount(&server)
        .await;

    let mut invoice = common::invoice();
    invoice.edi.uuid = Some("cufe-0005".into());

    let processed = workflow(common::company(&server.uri())).sync_from_logs(&invoice).await;
    assert_eq!(processed.invoice, invoice);
    assert!(processed
        .notices
        .iter()
        .any(|notice| notice.level == NoticeLevel::Warning && notice.message.contains("autenticación")));
}

#[tokio::test]
async fn batch_stops_at_first_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/ubl2.1/invoice/{}", common::TEST_SET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::sent_to_test_set("cufe-batch")))
        .expect(1)
        .mount(&server)
        .await;

    let first = common::invoice();
    let mut second = common::invoice();
    second.id = 2;
    second.partner.email = None;
    second.partner.email_edi = None;
    let mut third = common::invoice();
    third.id = 3;

    let outcome = workflow(common::company(&server.uri()))
        .open_batch(&[first, second, third])
        .await;

    assert_eq!(outcome.completed.len(), 1);
    assert_eq!(outcome.completed[0].invoice.state, InvoiceState::Open);
    let failure = outcome.failed.expect("second invoice fails");
    assert_eq!(failure.invoice_id, 2);
    assert!(failure.error.is_local());
}

#[tokio::test]
async fn null_is_valid_in_enablement_still_opens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/ubl2.1/invoice/{}", common::TEST_SET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "is_valid": null, "uuid": "cufe-test" })))
        .expect(1)
        .mount(&server)
        .await;

    let processed = workflow(common::company(&server.uri()))
        .validate_dian_test(&common::invoice())
        .await
        .unwrap();

    assert_eq!(processed.invoice.state, InvoiceState::Open);
    assert!(!processed.invoice.edi.is_valid);
    assert_eq!(processed.invoice.edi.uuid.as_deref(), Some("cufe-test"));
    assert!(processed.notices.contains(NoticeLevel::Success, ENABLEMENT_MESSAGE));
}

#[tokio::test]
async fn null_is_valid_in_status_and_logs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/status/document/cufe-0006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "is_valid": null, "uuid": "cufe-0006" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/logs/cufe-0006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 40, "is_valid": null, "uuid": "cufe-0006" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut invoice = common::invoice();
    invoice.state = InvoiceState::Open;
    invoice.edi.uuid = Some("cufe-0006".into());
    let workflow = workflow(common::company(&server.uri()));

    let processed = workflow.refresh_status(&invoice).await.unwrap();
    assert!(!processed.invoice.edi.is_valid);
    assert!(processed.notices.contains(NoticeLevel::Info, ENABLEMENT_MESSAGE));

    let processed = workflow.sync_from_logs(&invoice).await;
    assert!(!processed.invoice.edi.is_valid);
    assert!(processed
        .notices
        .contains(NoticeLevel::Warning, "No se ha validado el documento."));
}
