//! Response Writer: copies API results onto the invoice's EDI fields.

use shared::Result;
use tracing::debug;

use super::attached_document::is_attached_document_matched;
use super::qr::QrRenderer;
use crate::models::{DocumentLog, DocumentResponse, Invoice};

#[derive(Default)]
pub struct ResponseWriter {
    qr: QrRenderer,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

impl ResponseWriter {
    pub fn new(qr: QrRenderer) -> Self {
        Self { qr }
    }

    /// Overwrites the response fields of `invoice` with `response`.
    pub fn write_response(&self, invoice: &mut Invoice, response: &DocumentResponse) -> Result<()> {
        let edi = &mut invoice.edi;
        edi.is_valid = response.is_valid;
        edi.algorithm = response.algorithm.clone();
        edi.uuid = response.uuid.clone();
        edi.issue_date = response.issue_date.clone();
        edi.zip_key = response.zip_key.clone();
        edi.status_code = response.status_code.clone();
        edi.status_description = response.status_description.clone();
        edi.status_message = response.status_message.clone();
        edi.xml_name = response.xml_name.clone();
        edi.zip_name = response.zip_name.clone();
        edi.xml_base64_bytes = response.xml_base64_bytes.clone();
        if let Some(errors) = response.errors_text() {
            edi.errors_messages = Some(errors);
        }
        edi.qr_data = response.qr_data.clone();
        edi.application_response_base64_bytes = response.application_response_base64_bytes.clone();
        edi.attached_document_base64_bytes = response.attached_document_base64_bytes.clone();
        edi.pdf_base64_bytes = response.pdf_base64_bytes.clone();
        edi.zip_base64_bytes = response.zip_base64_bytes.clone();
        edi.signature = response.signature.clone();

        self.refresh_derived(invoice)
    }

    /// Fills the invoice from the first valid log entry, keeping its UUID.
    /// Returns false when no entry is valid.
    pub fn merge_logs(&self, invoice: &mut Invoice, logs: &[DocumentLog]) -> Result<bool> {
        let Some(log) = logs.iter().find(|log| log.document.is_valid) else {
            return Ok(false);
        };
        debug!("Log {} aplicado a la factura {}", log.id, invoice.id);

        let document = &log.document;
        let edi = &mut invoice.edi;
        edi.is_valid = true;

        let fields = [
            (&mut edi.algorithm, &document.algorithm),
            (&mut edi.issue_date, &document.issue_date),
            (&mut edi.zip_key, &document.zip_key),
            (&mut edi.status_code, &document.status_code),
            (&mut edi.status_description, &document.status_description),
            (&mut edi.status_message, &document.status_message),
            (&mut edi.xml_name, &document.xml_name),
            (&mut edi.zip_name, &document.zip_name),
            (&mut edi.xml_base64_bytes, &document.xml_base64_bytes),
            (&mut edi.qr_data, &document.qr_data),
            (
                &mut edi.application_response_base64_bytes,
                &document.application_response_base64_bytes,
            ),
            (
                &mut edi.attached_document_base64_bytes,
                &document.attached_document_base64_bytes,
            ),
            (&mut edi.pdf_base64_bytes, &document.pdf_base64_bytes),
            (&mut edi.zip_base64_bytes, &document.zip_base64_bytes),
            (&mut edi.signature, &document.signature),
        ];
        for (target, source) in fields {
            if let Some(value) = non_empty(source) {
                *target = Some(value);
            }
        }

        self.refresh_derived(invoice)?;
        Ok(true)
    }

    /// QR image and attached-document check follow the stored fields.
    fn refresh_derived(&self, invoice: &mut Invoice) -> Result<()> {
        invoice.edi.qr_image = match non_empty(&invoice.edi.qr_data) {
            Some(data) => Some(self.qr.render_base64(&data)?),
            None => None,
        };

        let number_formatted = invoice.number_formatted();
        invoice.edi.is_attached_document_matched = invoice
            .edi
            .attached_document_base64_bytes
            .as_deref()
            .filter(|b| !b.is_empty())
            .is_some_and(|b| is_attached_document_matched(b, &number_formatted));

        Ok(())
    }
}
