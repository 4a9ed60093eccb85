use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::EdiDocumentKind;
use super::partner::Partner;

pub const EXCLUDED_TAX_NAME: &str = "IVA Excluido";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    OutInvoice,
    OutRefund,
    InInvoice,
    InRefund,
}

impl MoveType {
    pub fn is_outbound(&self) -> bool {
        matches!(self, MoveType::OutInvoice | MoveType::OutRefund)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceState {
    Draft,
    /// Validando DIAN
    Validate,
    Open,
    Paid,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxAmountType {
    Percent,
    Fixed,
    Group,
    Division,
}

/// DIAN tax type a local tax is mapped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdiTax {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub id: i64,
    pub name: String,
    pub amount_type: TaxAmountType,
    pub amount: Decimal,
    pub edi_tax: Option<EdiTax>,
}

impl Tax {
    pub fn is_excluded(&self) -> bool {
        self.name == EXCLUDED_TAX_NAME
    }

    /// Retenciones never reach the DIAN payload.
    pub fn is_withholding(&self) -> bool {
        match &self.edi_tax {
            Some(edi_tax) => edi_tax.name.starts_with("Rete"),
            None => self.name.starts_with("Rte"),
        }
    }

    /// Tax amount for one line. Group and division taxes are not computed here.
    pub fn compute(&self, base: Decimal, quantity: Decimal) -> Decimal {
        match self.amount_type {
            TaxAmountType::Percent => base * self.amount / Decimal::ONE_HUNDRED,
            TaxAmountType::Fixed => quantity * self.amount,
            TaxAmountType::Group | TaxAmountType::Division => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    /// Referencia interna
    pub code: Option<String>,
    pub edi_unit_measure_id: Option<i64>,
    /// DIAN unit configured on the product's unit of measure; wins over the product field.
    pub uom_edi_unit_measure_id: Option<i64>,
}

impl Product {
    pub fn unit_measure_id(&self) -> Option<i64> {
        self.uom_edi_unit_measure_id.or(self.edi_unit_measure_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub product: Product,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    /// Percentage.
    #[serde(default)]
    pub discount: Decimal,
    pub price_subtotal: Decimal,
    #[serde(default)]
    pub taxes: Vec<Tax>,
    /// Section and note lines carry no account and are never submitted.
    pub account_id: Option<i64>,
}

impl InvoiceLine {
    pub fn new(
        description: impl Into<String>,
        product: Product,
        quantity: Decimal,
        price_unit: Decimal,
        discount: Decimal,
        taxes: Vec<Tax>,
    ) -> Self {
        let gross = quantity * price_unit;
        let price_subtotal = gross - gross * discount / Decimal::ONE_HUNDRED;
        Self {
            description: description.into(),
            product,
            quantity,
            price_unit,
            discount,
            price_subtotal,
            taxes,
            account_id: Some(1),
        }
    }

    pub fn gross_amount(&self) -> Decimal {
        self.quantity * self.price_unit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    /// ERP convention: units of this currency per one unit of company currency.
    pub rate: Decimal,
    #[serde(default)]
    pub rate_inverted: bool,
    pub decimal_places: u32,
    pub unit_label: String,
    pub subunit_label: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            code: "COP".to_string(),
            rate: Decimal::ONE,
            rate_inverted: false,
            decimal_places: 2,
            unit_label: "Pesos".to_string(),
            subunit_label: "Centavos".to_string(),
        }
    }
}

/// API resolution ids configured on the journal sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalResolutions {
    pub invoice: Option<i64>,
    pub credit_note: Option<i64>,
    pub debit_note: Option<i64>,
}

impl JournalResolutions {
    pub fn for_kind(&self, kind: EdiDocumentKind) -> Option<i64> {
        match kind {
            EdiDocumentKind::Invoice => self.invoice,
            EdiDocumentKind::CreditNote => self.credit_note,
            EdiDocumentKind::DebitNote => self.debit_note,
        }
    }
}

/// The invoice a credit or debit note corrects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginInvoice {
    pub number: String,
    pub uuid: Option<String>,
    pub issue_date: Option<String>,
}

/// Electronic-invoicing fields written back from the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdiFields {
    pub number: Option<String>,
    pub type_document_id: Option<i64>,
    /// Production flag captured when the invoice was opened.
    pub is_not_test: bool,
    pub sync: bool,

    pub is_valid: bool,
    pub algorithm: Option<String>,
    pub uuid: Option<String>,
    pub issue_date: Option<String>,
    pub zip_key: Option<String>,
    pub status_code: Option<String>,
    pub status_description: Option<String>,
    pub status_message: Option<String>,
    pub xml_name: Option<String>,
    pub zip_name: Option<String>,
    pub errors_messages: Option<String>,
    pub qr_data: Option<String>,
    pub signature: Option<String>,
    pub xml_base64_bytes: Option<String>,
    pub application_response_base64_bytes: Option<String>,
    pub attached_document_base64_bytes: Option<String>,
    pub pdf_base64_bytes: Option<String>,
    pub zip_base64_bytes: Option<String>,
    /// PNG, base64.
    pub qr_image: Option<String>,
    pub is_attached_document_matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub move_type: MoveType,
    pub state: InvoiceState,
    pub number: Option<String>,
    /// Number of the invoice a note refers to.
    pub origin: Option<String>,
    #[serde(default)]
    pub is_debit_note: bool,
    pub reference: Option<String>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub date_invoice: Option<NaiveDate>,
    pub date_due: Option<NaiveDate>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default = "default_company_currency")]
    pub company_currency: String,
    pub rate_date: Option<NaiveDate>,
    pub partner: Partner,
    pub lines: Vec<InvoiceLine>,
    #[serde(default)]
    pub journal: JournalResolutions,
    pub correction_concept_credit_id: Option<i64>,
    pub correction_concept_debit_id: Option<i64>,
    #[serde(default)]
    pub is_pos_journal: bool,
    pub origin_invoice: Option<OriginInvoice>,
    #[serde(default)]
    pub edi: EdiFields,
}

fn default_company_currency() -> String {
    "COP".to_string()
}

impl Invoice {
    /// Which DIAN document this invoice becomes, if any.
    pub fn edi_kind(&self) -> Option<EdiDocumentKind> {
        match self.move_type {
            MoveType::OutInvoice if self.origin.is_some() && self.is_debit_note => Some(EdiDocumentKind::DebitNote),
            MoveType::OutInvoice => Some(EdiDocumentKind::Invoice),
            MoveType::OutRefund => Some(EdiDocumentKind::CreditNote),
            MoveType::InInvoice | MoveType::InRefund => None,
        }
    }

    /// Correction concept selected for the note kind of this invoice.
    pub fn correction_concept_id(&self) -> Option<i64> {
        match self.edi_kind()? {
            EdiDocumentKind::CreditNote => self.correction_concept_credit_id,
            EdiDocumentKind::DebitNote => self.correction_concept_debit_id,
            EdiDocumentKind::Invoice => None,
        }
    }

    pub fn number_formatted(&self) -> String {
        self.number.as_deref().map(format_number).unwrap_or_default()
    }

    pub fn has_attached_document(&self) -> bool {
        self.edi
            .attached_document_base64_bytes
            .as_deref()
            .is_some_and(|b| !b.is_empty())
    }
}

/// All ASCII digits of `number`, in order.
pub fn number_digits(number: &str) -> String {
    number.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `FV-000123` -> `FV-123`. Numbers whose digits are not one contiguous run
/// are returned unchanged.
pub fn format_number(number: &str) -> String {
    let digits = number_digits(number);
    if digits.is_empty() {
        return number.to_string();
    }
    match number.find(&digits) {
        Some(pos) => {
            let trimmed = digits.trim_start_matches('0');
            let value = if trimmed.is_empty() { "0" } else { trimmed };
            format!("{}{}", &number[..pos], value)
        }
        None => number.to_string(),
    }
}
