//! Submission workflow: `draft -> [validate] -> open`.
//!
//! Every operation works on a copy of the invoice and hands back the new
//! version; on error the caller's invoice is left as it was.

use serde::Serialize;
use shared::{AppError, CompanyConfig, RejectionDetails, Result};
use tracing::{error, info, warn};

use super::amounts;
use super::assembler::{self, DocumentRequest};
use super::notifications::Notices;
use super::response_writer::ResponseWriter;
use crate::models::{DocumentResponse, Invoice, InvoiceState};
use crate::services::DianApiClient;

pub const SUCCESS_MESSAGE: &str = "La validación ante la DIAN ha sido exitosa.";
pub const ENABLEMENT_MESSAGE: &str = "Documento enviado a la DIAN en habilitación.";
pub const SKIPPED_MESSAGE: &str = "Se ha saltado el proceso de validación.";
pub const ZERO_TOTAL_MESSAGE: &str = "Revise su factura nuevamente. ¿Está facturando algo realmente?";
pub const UUID_REQUIRED_MESSAGE: &str = "Se necesita un UUID para verificar el estado del documento.";
pub const MASS_SEND_PRINT_MESSAGE: &str = "Se ha solicitado el envío automático de la factura por correo.";

#[derive(Debug, Clone, Serialize)]
pub struct Processed {
    pub invoice: Invoice,
    pub notices: Notices,
    /// The host should email the printed invoice.
    pub mass_send_print_requested: bool,
}

impl Processed {
    fn new(invoice: Invoice, notices: Notices) -> Self {
        Self {
            invoice,
            notices,
            mass_send_print_requested: false,
        }
    }
}

#[derive(Debug)]
pub struct BatchFailure {
    pub invoice_id: i64,
    pub error: AppError,
}

/// Invoices before the failing one keep their result; nothing is rolled back.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub completed: Vec<Processed>,
    pub failed: Option<BatchFailure>,
}

/// How a status answer is reported to the user.
#[derive(Clone, Copy)]
enum Channel {
    Submission,
    StatusQuery,
}

pub struct InvoiceWorkflow {
    company: CompanyConfig,
    http: reqwest::Client,
    writer: ResponseWriter,
}

impl InvoiceWorkflow {
    pub fn new(company: CompanyConfig, http: reqwest::Client) -> Self {
        Self {
            company,
            http,
            writer: ResponseWriter::default(),
        }
    }

    fn api(&self) -> Result<DianApiClient> {
        DianApiClient::with_http_client(self.http.clone(), &self.company)
    }

    /// The document that would be submitted for `invoice`, without sending it.
    pub fn document(&self, invoice: &Invoice) -> Result<DocumentRequest> {
        assembler::assemble(invoice)
    }

    /// Posting of a draft invoice. Outbound invoices not yet accepted by DIAN
    /// and not issued from a POS journal are submitted (or parked in
    /// `validate` when the company asks for it).
    pub async fn open(&self, invoice: &Invoice) -> Result<Processed> {
        if invoice.state != InvoiceState::Draft {
            return Ok(Processed::new(invoice.clone(), Notices::default()));
        }

        if invoice.move_type.is_outbound() && amounts::compute(invoice).amount_total.is_zero() {
            return Err(AppError::validation(ZERO_TOTAL_MESSAGE));
        }

        let mut updated = invoice.clone();
        let eligible = invoice.move_type.is_outbound() && !invoice.edi.is_valid && !invoice.is_pos_journal;
        if !eligible {
            updated.state = InvoiceState::Open;
            return Ok(Processed::new(updated, Notices::default()));
        }

        updated.edi.is_not_test = self.company.is_not_test;

        if self.company.enable_validate_state {
            info!("Factura {} en espera de validación DIAN", invoice.id);
            updated.state = InvoiceState::Validate;
            return Ok(Processed::new(updated, Notices::default()));
        }

        let in_production = updated.edi.is_not_test;
        let mut processed = self.validate(&updated, !in_production).await?;
        if in_production && self.company.enable_mass_send_print {
            processed.mass_send_print_requested = true;
            processed.notices.info(MASS_SEND_PRINT_MESSAGE);
        }
        processed.invoice.state = InvoiceState::Open;
        Ok(processed)
    }

    /// Opens `invoices` one after the other, stopping at the first failure.
    pub async fn open_batch(&self, invoices: &[Invoice]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for invoice in invoices {
            match self.open(invoice).await {
                Ok(processed) => outcome.completed.push(processed),
                Err(error) => {
                    error!("Factura {} no procesada, se detiene el lote: {}", invoice.id, error);
                    outcome.failed = Some(BatchFailure {
                        invoice_id: invoice.id,
                        error,
                    });
                    break;
                }
            }
        }
        outcome
    }

    /// Validar DIAN (producción) and open.
    pub async fn validate_dian(&self, invoice: &Invoice) -> Result<Processed> {
        let mut processed = self.validate(invoice, false).await?;
        processed.invoice.state = InvoiceState::Open;
        Ok(processed)
    }

    /// Validar DIAN en habilitación and open.
    pub async fn validate_dian_test(&self, invoice: &Invoice) -> Result<Processed> {
        let mut processed = self.validate(invoice, true).await?;
        processed.invoice.state = InvoiceState::Open;
        Ok(processed)
    }

    pub fn skip(&self, invoice: &Invoice) -> Processed {
        let mut updated = invoice.clone();
        updated.state = InvoiceState::Open;
        let mut notices = Notices::default();
        notices.warning(SKIPPED_MESSAGE);
        Processed::new(updated, notices)
    }

    /// Submits `invoice` once. Already accepted invoices are returned as they are.
    pub async fn validate(&self, invoice: &Invoice, is_test: bool) -> Result<Processed> {
        if invoice.edi.is_valid {
            info!("Factura {} ya fue validada ante la DIAN, no se reenvía", invoice.id);
            return Ok(Processed::new(invoice.clone(), Notices::default()));
        }

        let kind = assembler::document_kind(invoice)?;
        let request = assembler::assemble(invoice)?;
        let test_set_id = if is_test || !invoice.edi.is_not_test {
            Some(self.company.require_test_set_id()?)
        } else {
            None
        };

        let api = self.api()?;
        let response = api.submit_document(kind, &request, test_set_id).await?;

        let mut updated = invoice.clone();
        updated.edi.number = Some(request.number.to_string());
        updated.edi.type_document_id = Some(request.type_document_id);
        updated.edi.sync = request.sync;

        let mut notices = Notices::default();
        self.apply_document_response(&mut updated, &response, Channel::Submission, &mut notices)?;

        if !is_test && !updated.has_attached_document() {
            self.recover_attached_document(&api, &mut updated, &mut notices).await;
        }

        Ok(Processed::new(updated, notices))
    }

    /// Consulta el estado del documento (`/status/document/{uuid}`).
    pub async fn refresh_status(&self, invoice: &Invoice) -> Result<Processed> {
        assembler::document_kind(invoice)?;
        let uuid = invoice
            .edi
            .uuid
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::validation(UUID_REQUIRED_MESSAGE))?;

        let response = self.api()?.document_status(uuid).await?;

        let mut updated = invoice.clone();
        let mut notices = Notices::default();
        self.apply_document_response(&mut updated, &response, Channel::StatusQuery, &mut notices)?;
        Ok(Processed::new(updated, notices))
    }

    /// Fills the invoice from `/logs/{uuid}`. Failures only produce warnings.
    pub async fn sync_from_logs(&self, invoice: &Invoice) -> Processed {
        let mut updated = invoice.clone();
        let mut notices = Notices::default();
        self.apply_logs(&mut updated, &mut notices).await;
        Processed::new(updated, notices)
    }

    async fn apply_logs(&self, invoice: &mut Invoice, notices: &mut Notices) {
        let mut candidate = invoice.clone();
        let outcome: Result<bool> = async {
            assembler::document_kind(&candidate)?;
            let uuid = candidate
                .edi
                .uuid
                .clone()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| AppError::validation(UUID_REQUIRED_MESSAGE))?;
            let logs = self.api()?.document_logs(&uuid).await?;
            self.writer.merge_logs(&mut candidate, &logs)
        }
        .await;

        match outcome {
            Ok(true) => {
                *invoice = candidate;
                notices.info(SUCCESS_MESSAGE);
            }
            Ok(false) => notices.warning("No se ha validado el documento."),
            Err(AppError::Validation { message }) => notices.warning(message),
            Err(AppError::Authentication { message }) => notices.warning(message),
            Err(AppError::ExternalService { message, .. }) => notices.warning(message),
            Err(e) => {
                warn!("Error al procesar la solicitud: {}", e);
                notices.warning("Error al procesar la solicitud");
            }
        }
    }

    /// Logs first, then a status query; the attached document is what the
    /// customer receives, so its absence is logged as an error.
    async fn recover_attached_document(&self, api: &DianApiClient, invoice: &mut Invoice, notices: &mut Notices) {
        self.apply_logs(invoice, notices).await;
        if invoice.has_attached_document() {
            return;
        }

        if let Some(uuid) = invoice.edi.uuid.clone().filter(|u| !u.is_empty()) {
            let mut candidate = invoice.clone();
            let outcome = match api.document_status(&uuid).await {
                Ok(response) => self.apply_document_response(&mut candidate, &response, Channel::StatusQuery, notices),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => *invoice = candidate,
                Err(e) => warn!("No se pudo consultar el estado del documento {}: {}", uuid, e),
            }
        }

        if !invoice.has_attached_document() {
            error!("No se ha logrado obtener un documento adjunto (attached document)");
        }
    }

    fn apply_document_response(
        &self,
        invoice: &mut Invoice,
        response: &DocumentResponse,
        channel: Channel,
        notices: &mut Notices,
    ) -> Result<()> {
        self.writer.write_response(invoice, response)?;

        let notify = |notices: &mut Notices, message: &str| match channel {
            Channel::Submission => notices.success(message),
            Channel::StatusQuery => notices.info(message),
        };

        if response.is_valid {
            notify(notices, SUCCESS_MESSAGE);
            return Ok(());
        }

        match response.uuid.as_deref() {
            Some(uuid) if !uuid.is_empty() => {
                if invoice.edi.is_not_test {
                    Err(AppError::rejected(RejectionDetails {
                        status_code: invoice.edi.status_code.clone(),
                        status_description: invoice.edi.status_description.clone(),
                        status_message: invoice.edi.status_message.clone(),
                        errors_messages: invoice.edi.errors_messages.clone(),
                    }))
                } else {
                    notify(notices, ENABLEMENT_MESSAGE);
                    Ok(())
                }
            }
            Some(_) => Err(AppError::processing("No se ha obtenido un UUID valido. Intente nuevamente.")),
            None => Err(AppError::processing("No se ha podido validar el documento ante la DIAN.")),
        }
    }
}
