//! Invoice Document Assembler
//!
//! Turns an [`Invoice`] into the JSON document accepted by
//! `/api/ubl2.1/{invoice|credit-note|debit-note}`. Every missing mapping is a
//! local validation error, raised before anything is sent.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{AppError, Result};
use tracing::debug;

use super::amounts::{self, InvoiceAmounts};
use crate::models::catalog::{
    correction_concept_for, currency_by_code, BASE_UNIT_MEASURE, DEFAULT_MERCHANT_REGISTRATION,
    FIXED_TAX_UNIT_MEASURE_ID, ITEM_IDENTIFICATION_STANDARD_ID, PAYMENT_METHOD_UNDEFINED_ID,
    REFERENCE_PRICE_COMMERCIAL_ID,
};
use crate::models::invoice::{format_number, number_digits};
use crate::models::{EdiDocumentKind, Invoice, InvoiceLine, PaymentForm, Tax, TaxAmountType};

pub const NOT_SUBMITTABLE: &str = "Este tipo de documento no necesita ser enviado a la DIAN";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRequest {
    pub number: u64,
    pub type_document_id: i64,
    pub resolution_id: i64,
    pub sync: bool,
    pub customer: Customer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_currency_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_exchange_rate: Option<PaymentExchangeRate>,
    #[serde(flatten)]
    pub body: DocumentBody,
    pub payment_forms: Vec<PaymentFormPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_reference: Option<BillingReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrepancy_response: Option<DiscrepancyResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
}

/// Kind-specific part of the document. Exactly one shape is ever emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentBody {
    Invoice {
        legal_monetary_totals: MonetaryTotals,
        invoice_lines: Vec<LinePayload>,
    },
    CreditNote {
        legal_monetary_totals: MonetaryTotals,
        credit_note_lines: Vec<LinePayload>,
    },
    DebitNote {
        requested_monetary_totals: MonetaryTotals,
        debit_note_lines: Vec<LinePayload>,
    },
}

impl DocumentBody {
    fn new(kind: EdiDocumentKind, totals: MonetaryTotals, lines: Vec<LinePayload>) -> Self {
        match kind {
            EdiDocumentKind::Invoice => DocumentBody::Invoice {
                legal_monetary_totals: totals,
                invoice_lines: lines,
            },
            EdiDocumentKind::CreditNote => DocumentBody::CreditNote {
                legal_monetary_totals: totals,
                credit_note_lines: lines,
            },
            EdiDocumentKind::DebitNote => DocumentBody::DebitNote {
                requested_monetary_totals: totals,
                debit_note_lines: lines,
            },
        }
    }

    pub fn lines(&self) -> &[LinePayload] {
        match self {
            DocumentBody::Invoice { invoice_lines, .. } => invoice_lines,
            DocumentBody::CreditNote { credit_note_lines, .. } => credit_note_lines,
            DocumentBody::DebitNote { debit_note_lines, .. } => debit_note_lines,
        }
    }

    pub fn totals(&self) -> &MonetaryTotals {
        match self {
            DocumentBody::Invoice { legal_monetary_totals, .. }
            | DocumentBody::CreditNote { legal_monetary_totals, .. } => legal_monetary_totals,
            DocumentBody::DebitNote { requested_monetary_totals, .. } => requested_monetary_totals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub type_document_identification_id: i64,
    pub identification_number: String,
    pub type_organization_id: i64,
    pub name: String,
    pub email: String,
    pub merchant_registration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    pub municipality_id: i64,
    pub type_regime_id: i64,
    pub type_liability_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentExchangeRate {
    pub type_currency_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub calculation_rate: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonetaryTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub line_extension_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_exclusive_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_inclusive_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub allowance_total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub charge_total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub payable_amount: Decimal,
}

impl MonetaryTotals {
    pub fn from_amounts(amounts: &InvoiceAmounts) -> Self {
        let allowance_total_amount = Decimal::ZERO;
        let charge_total_amount = Decimal::ZERO;
        let payable_amount = amounts.amount_total_no_withholding;
        Self {
            line_extension_amount: amounts.amount_untaxed,
            tax_exclusive_amount: amounts.amount_untaxed - amounts.amount_excluded,
            tax_inclusive_amount: payable_amount - charge_total_amount + allowance_total_amount,
            allowance_total_amount,
            charge_total_amount,
            payable_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePayload {
    pub unit_measure_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub invoiced_quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_extension_amount: Decimal,
    pub free_of_charge_indicator: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_price_id: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowance_charges: Vec<AllowanceCharge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_totals: Vec<TaxTotal>,
    pub description: String,
    pub code: String,
    pub type_item_identification_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowanceCharge {
    pub charge_indicator: bool,
    pub allowance_charge_reason: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaxTotal {
    Percent {
        tax_id: i64,
        #[serde(with = "rust_decimal::serde::float")]
        tax_amount: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        taxable_amount: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        percent: Decimal,
    },
    /// Impuesto por unidad (e.g. bolsas plásticas).
    Fixed {
        tax_id: i64,
        #[serde(with = "rust_decimal::serde::float")]
        tax_amount: Decimal,
        #[serde(with = "rust_decimal::serde::float")]
        taxable_amount: Decimal,
        unit_measure_id: i64,
        #[serde(with = "rust_decimal::serde::float")]
        per_unit_amount: Decimal,
        base_unit_measure: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentFormPayload {
    pub payment_form_id: i64,
    pub payment_method_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due_date: Option<NaiveDate>,
    pub duration_measure: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingReference {
    pub number: String,
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscrepancyResponse {
    pub reference: String,
    pub correction_concept_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub text: String,
}

/// Document kind of `invoice`, refusing inbound documents.
pub fn document_kind(invoice: &Invoice) -> Result<EdiDocumentKind> {
    invoice.edi_kind().ok_or_else(|| AppError::validation(NOT_SUBMITTABLE))
}

/// Builds the document with freshly computed aggregates.
pub fn assemble(invoice: &Invoice) -> Result<DocumentRequest> {
    let amounts = amounts::compute(invoice);
    assemble_with_amounts(invoice, &amounts)
}

pub fn assemble_with_amounts(invoice: &Invoice, amounts: &InvoiceAmounts) -> Result<DocumentRequest> {
    let kind = document_kind(invoice)?;

    let number = document_number(invoice)?;
    let resolution_id = invoice.journal.for_kind(kind).ok_or_else(|| {
        AppError::validation("Este tipo de documento no tiene asignada una resolucion DIAN")
    })?;
    let customer = customer(invoice)?;

    let (type_currency_id, payment_exchange_rate) = match exchange_rate(invoice)? {
        Some((currency_id, rate)) => (Some(currency_id), Some(rate)),
        None => (None, None),
    };

    let lines = lines(invoice)?;
    let body = DocumentBody::new(kind, MonetaryTotals::from_amounts(amounts), lines);

    let (billing_reference, discrepancy_response) = if kind.is_correction() {
        let (billing, discrepancy) = correction_reference(invoice, kind)?;
        (Some(billing), Some(discrepancy))
    } else {
        (None, None)
    };

    let notes = [invoice.name.as_deref(), invoice.comment.as_deref()]
        .into_iter()
        .flatten()
        .filter(|text| !text.is_empty())
        .map(|text| Note { text: text.to_string() })
        .collect();

    let request = DocumentRequest {
        number,
        type_document_id: kind.type_document().id,
        resolution_id,
        sync: invoice.edi.is_not_test,
        customer,
        due_date: invoice.date_due,
        type_currency_id,
        payment_exchange_rate,
        body,
        payment_forms: vec![payment_form(invoice)],
        billing_reference,
        discrepancy_response,
        notes,
    };

    debug!(
        "Documento {} armado para la factura {}: {}",
        kind,
        invoice.id,
        serde_json::to_string(&request).unwrap_or_default()
    );

    Ok(request)
}

fn document_number(invoice: &Invoice) -> Result<u64> {
    let digits = invoice.number.as_deref().map(number_digits).unwrap_or_default();
    digits
        .parse()
        .map_err(|_| AppError::validation("La factura aún no tiene un número asignado"))
}

/// Customer block. An invoice-address contact bills its parent company but
/// keeps its own email, VAT, phone and street.
pub fn customer(invoice: &Invoice) -> Result<Customer> {
    let contact = &invoice.partner;
    let commercial = contact.commercial_partner();

    let email = if contact.is_invoice_address() {
        contact.email.as_deref()
    } else {
        commercial.email_edi.as_deref()
    }
    .filter(|e| !e.is_empty())
    .ok_or_else(|| {
        AppError::validation(
            "El cliente debe tener un correo electrónico donde enviar la factura.\nAgreguelo e intente nuevamente.",
        )
    })?;

    let document_type = commercial.document_type;
    let type_document_identification_id = document_type
        .and_then(|d| d.type_document_identification_id())
        .ok_or_else(|| {
            AppError::validation(
                "El cliente no tiene asociado un tipo de documento de identificación, agregelo e intente nuevamente.",
            )
        })?;

    let mut identification_number = contact.vat.as_deref().map(number_digits).unwrap_or_default();
    // NIT: sin dígito de verificación
    if document_type.is_some_and(|d| d.is_nit()) {
        identification_number.pop();
    }
    if identification_number.is_empty() {
        return Err(AppError::validation(
            "El cliente no tiene un número de documento de identificación, agregelo e intente nuevamente.",
        ));
    }

    let municipality_id = commercial
        .municipality_id
        .ok_or_else(|| AppError::validation("Debe asignarle al cliente una municipalidad"))?;
    let type_regime_id = commercial
        .type_regime_id
        .ok_or_else(|| AppError::validation("Debe asignarle al cliente un tipo de regimen"))?;
    let type_liability_id = commercial
        .type_liability_id
        .ok_or_else(|| AppError::validation("Debe asignarle al cliente un tipo de responsabilidad"))?;

    let phone = contact.phone.as_deref().map(|phone| {
        let local = phone.strip_prefix("+57").unwrap_or(phone);
        number_digits(local)
    });

    let address = contact
        .street
        .as_deref()
        .and_then(|street| street.split(',').next())
        .map(str::to_string);

    Ok(Customer {
        type_document_identification_id,
        identification_number,
        type_organization_id: commercial.type_organization_id(),
        name: commercial.name.clone(),
        email: email.to_string(),
        merchant_registration: commercial
            .merchant_registration
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MERCHANT_REGISTRATION.to_string()),
        trade_name: commercial.trade_name.clone().filter(|t| !t.is_empty()),
        municipality_id,
        type_regime_id,
        type_liability_id,
        phone: phone.filter(|p| !p.is_empty()),
        address: address.filter(|a| !a.is_empty()),
    })
}

/// `type_currency_id` plus the exchange block, only for foreign-currency invoices.
fn exchange_rate(invoice: &Invoice) -> Result<Option<(i64, PaymentExchangeRate)>> {
    if invoice.currency.code.eq_ignore_ascii_case(&invoice.company_currency) {
        return Ok(None);
    }

    let unknown = || AppError::validation("Un tipo de moneda no corresponde con ningun tipo de moneda DIAN");
    let company_currency = currency_by_code(&invoice.company_currency).ok_or_else(unknown)?;
    let invoice_currency = currency_by_code(&invoice.currency.code).ok_or_else(unknown)?;

    // The ERP stores company->invoice rates; DIAN wants invoice->company.
    let calculation_rate = if invoice.currency.rate_inverted {
        invoice.currency.rate
    } else {
        Decimal::ONE
            .checked_div(invoice.currency.rate)
            .ok_or_else(|| AppError::validation(format!("Tasa de cambio inválida para {}", invoice.currency.code)))?
    };

    Ok(Some((
        invoice_currency.id,
        PaymentExchangeRate {
            type_currency_id: company_currency.id,
            calculation_rate,
            date: invoice.rate_date.unwrap_or_else(|| Local::now().date_naive()),
        },
    )))
}

pub fn payment_form(invoice: &Invoice) -> PaymentFormPayload {
    let (form, duration_measure, payment_due_date) = match (invoice.date_invoice, invoice.date_due) {
        (Some(issued), Some(due)) if issued >= due => (PaymentForm::Cash, 0, Some(due)),
        (Some(issued), Some(due)) => (PaymentForm::Credit, (due - issued).num_days(), Some(due)),
        (issued, _) => {
            debug!("La fecha de factura o de pago no son validas");
            (PaymentForm::Cash, 0, issued)
        }
    };

    PaymentFormPayload {
        payment_form_id: form.id(),
        payment_method_id: PAYMENT_METHOD_UNDEFINED_ID,
        payment_due_date,
        duration_measure,
    }
}

fn lines(invoice: &Invoice) -> Result<Vec<LinePayload>> {
    invoice
        .lines
        .iter()
        .filter(|line| line.account_id.is_some())
        .map(line_payload)
        .collect()
}

fn line_payload(line: &InvoiceLine) -> Result<LinePayload> {
    let code = line.product.code.clone().filter(|c| !c.is_empty()).ok_or_else(|| {
        AppError::validation("Todos los productos deben tener asignada una 'Referencia interna'.\nRevise, por favor.")
    })?;
    let unit_measure_id = line.product.unit_measure_id().ok_or_else(|| {
        AppError::validation(
            "Todos los productos deben tener asignada una 'Unidad de medida (DIAN)'.\nRevise, por favor.",
        )
    })?;

    let allowance_charges = if line.discount.is_zero() {
        Vec::new()
    } else {
        vec![AllowanceCharge {
            charge_indicator: false,
            allowance_charge_reason: "Discount".to_string(),
            amount: line.discount / Decimal::ONE_HUNDRED * line.gross_amount(),
            // UBL base amount, not the discount percentage
            base_amount: line.gross_amount(),
        }]
    };

    let tax_totals = line
        .taxes
        .iter()
        .map(|tax| tax_total(line, tax))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    Ok(LinePayload {
        unit_measure_id,
        invoiced_quantity: line.quantity,
        line_extension_amount: line.price_subtotal,
        free_of_charge_indicator: line.price_subtotal.is_zero(),
        reference_price_id: (!tax_totals.is_empty()).then_some(REFERENCE_PRICE_COMMERCIAL_ID),
        allowance_charges,
        tax_totals,
        description: line.description.clone(),
        code,
        type_item_identification_id: ITEM_IDENTIFICATION_STANDARD_ID,
        price_amount: line.price_unit,
        base_quantity: Decimal::ONE,
    })
}

/// `None` for taxes DIAN must not see (withholdings, excluded VAT).
fn tax_total(line: &InvoiceLine, tax: &Tax) -> Result<Option<TaxTotal>> {
    let edi_tax = tax.edi_tax.as_ref().ok_or_else(|| {
        AppError::validation(
            "Todos los impuestos deben tener asignado un 'Tipo de impuesto (DIAN)'.\nRevise por favor e intente nuevamente",
        )
    })?;

    if tax.is_withholding() || tax.is_excluded() {
        return Ok(None);
    }

    let taxable_amount = line.price_subtotal;
    match tax.amount_type {
        TaxAmountType::Percent => Ok(Some(TaxTotal::Percent {
            tax_id: edi_tax.id,
            tax_amount: tax.compute(taxable_amount, line.quantity),
            taxable_amount,
            percent: tax.amount,
        })),
        TaxAmountType::Fixed => Ok(Some(TaxTotal::Fixed {
            tax_id: edi_tax.id,
            tax_amount: tax.compute(taxable_amount, line.quantity),
            taxable_amount: Decimal::ZERO,
            unit_measure_id: FIXED_TAX_UNIT_MEASURE_ID,
            per_unit_amount: tax.amount,
            base_unit_measure: BASE_UNIT_MEASURE.to_string(),
        })),
        TaxAmountType::Group | TaxAmountType::Division => Err(AppError::validation(
            "La facturación electrónica aún no es compatible con este tipo de impuesto.",
        )),
    }
}

fn correction_reference(
    invoice: &Invoice,
    kind: EdiDocumentKind,
) -> Result<(BillingReference, DiscrepancyResponse)> {
    let origin = invoice
        .origin_invoice
        .as_ref()
        .filter(|origin| origin.uuid.as_deref().is_some_and(|u| !u.is_empty()))
        .ok_or_else(|| AppError::validation("La factura de referencia aun no ha sido validada ante la DIAN"))?;

    let concept = invoice
        .correction_concept_id()
        .and_then(|id| correction_concept_for(kind, id))
        .ok_or_else(|| AppError::validation("Es necesario que seleccione primero un código de corrección"))?;

    Ok((
        BillingReference {
            number: format_number(&origin.number),
            uuid: origin.uuid.clone().unwrap_or_default(),
            issue_date: origin.issue_date.clone(),
        },
        DiscrepancyResponse {
            reference: invoice.reference.clone().unwrap_or_default(),
            correction_concept_id: concept.id,
            description: invoice.name.clone().unwrap_or_default(),
        },
    ))
}
