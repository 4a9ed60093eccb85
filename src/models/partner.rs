use serde::{Deserialize, Serialize};

/// Colombian identification document kinds, as the ERP names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationDocument {
    CivilRegistration,
    IdCard,
    IdDocument,
    NationalCitizenId,
    ResidenceDocument,
    ForeignIdCard,
    /// NIT
    Rut,
    Passport,
    ExternalId,
    DiplomaticCard,
}

impl IdentificationDocument {
    /// API `type_document_identification_id`; `None` when DIAN has no code for it.
    pub fn type_document_identification_id(&self) -> Option<i64> {
        match self {
            IdentificationDocument::CivilRegistration => Some(1),
            IdentificationDocument::IdCard => Some(2),
            IdentificationDocument::IdDocument | IdentificationDocument::NationalCitizenId => Some(3),
            IdentificationDocument::ResidenceDocument => Some(4),
            IdentificationDocument::ForeignIdCard => Some(5),
            IdentificationDocument::Rut => Some(6),
            IdentificationDocument::Passport => Some(7),
            IdentificationDocument::ExternalId => Some(8),
            IdentificationDocument::DiplomaticCard => None,
        }
    }

    pub fn is_nit(&self) -> bool {
        matches!(self, IdentificationDocument::Rut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    #[default]
    Contact,
    /// Dirección de facturación de una empresa (tiene `parent`).
    Invoice,
    Delivery,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_company: bool,
    #[serde(default)]
    pub address_kind: AddressKind,
    pub vat: Option<String>,
    pub document_type: Option<IdentificationDocument>,
    pub email: Option<String>,
    /// Email dedicated to electronic-invoice delivery.
    pub email_edi: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub trade_name: Option<String>,
    pub merchant_registration: Option<String>,
    pub municipality_id: Option<i64>,
    pub type_regime_id: Option<i64>,
    pub type_liability_id: Option<i64>,
    pub parent: Option<Box<Partner>>,
}

impl Partner {
    /// Entity the invoice is legally addressed to.
    pub fn commercial_partner(&self) -> &Partner {
        match (&self.address_kind, &self.parent) {
            (AddressKind::Invoice, Some(parent)) => parent,
            _ => self,
        }
    }

    pub fn is_invoice_address(&self) -> bool {
        self.address_kind == AddressKind::Invoice && self.parent.is_some()
    }

    pub fn type_organization_id(&self) -> i64 {
        if self.is_company {
            1
        } else {
            2
        }
    }
}
