//! Test records shared by the EDI unit tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    Currency, EdiFields, EdiTax, IdentificationDocument, Invoice, InvoiceLine, InvoiceState,
    JournalResolutions, MoveType, Partner, Product, Tax, TaxAmountType,
};

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn vat_19() -> Tax {
    Tax {
        id: 1,
        name: "IVA 19%".into(),
        amount_type: TaxAmountType::Percent,
        amount: dec("19"),
        edi_tax: Some(EdiTax { id: 1, name: "IVA".into() }),
    }
}

pub fn withholding_tax() -> Tax {
    Tax {
        id: 2,
        name: "Rte Fuente 2.5%".into(),
        amount_type: TaxAmountType::Percent,
        amount: dec("-2.5"),
        edi_tax: Some(EdiTax { id: 6, name: "ReteFuente".into() }),
    }
}

pub fn excluded_tax() -> Tax {
    Tax {
        id: 3,
        name: "IVA Excluido".into(),
        amount_type: TaxAmountType::Percent,
        amount: Decimal::ZERO,
        edi_tax: Some(EdiTax { id: 1, name: "IVA".into() }),
    }
}

pub fn bag_tax() -> Tax {
    Tax {
        id: 4,
        name: "Impuesto a las bolsas".into(),
        amount_type: TaxAmountType::Fixed,
        amount: dec("50"),
        edi_tax: Some(EdiTax { id: 22, name: "INC Bolsas".into() }),
    }
}

fn product(code: &str) -> Product {
    Product {
        id: 1,
        code: Some(code.into()),
        edi_unit_measure_id: Some(70),
        uom_edi_unit_measure_id: None,
    }
}

pub fn line_with_taxes(description: &str, code: &str, price: &str, taxes: Vec<Tax>) -> InvoiceLine {
    InvoiceLine::new(description, product(code), Decimal::ONE, dec(price), Decimal::ZERO, taxes)
}

pub fn line_with_discount(quantity: &str, price: &str, discount: &str) -> InvoiceLine {
    InvoiceLine::new(
        "Servicio de consultoría",
        product("SRV-01"),
        dec(quantity),
        dec(price),
        dec(discount),
        vec![vat_19()],
    )
}

pub fn partner() -> Partner {
    Partner {
        id: 7,
        name: "Comercializadora Andina S.A.S.".into(),
        is_company: true,
        vat: Some("900.123.456-7".into()),
        document_type: Some(IdentificationDocument::Rut),
        email: Some("gerencia@andina.co".into()),
        email_edi: Some("facturas@andina.co".into()),
        phone: Some("+57 300 123 4567".into()),
        street: Some("Calle 10 # 20-30, Oficina 201".into()),
        municipality_id: Some(149),
        type_regime_id: Some(2),
        type_liability_id: Some(14),
        ..Default::default()
    }
}

/// One line, 1 × 100000 with 19% VAT.
pub fn invoice() -> Invoice {
    Invoice {
        id: 1,
        move_type: MoveType::OutInvoice,
        state: InvoiceState::Draft,
        number: Some("SETP990000001".into()),
        origin: None,
        is_debit_note: false,
        reference: None,
        name: None,
        comment: None,
        date_invoice: NaiveDate::from_ymd_opt(2021, 3, 1),
        date_due: NaiveDate::from_ymd_opt(2021, 3, 1),
        currency: Currency::default(),
        company_currency: "COP".into(),
        rate_date: None,
        partner: partner(),
        lines: vec![line_with_taxes("Servicio de consultoría", "SRV-01", "100000", vec![vat_19()])],
        journal: JournalResolutions {
            invoice: Some(12),
            credit_note: Some(13),
            debit_note: Some(14),
        },
        correction_concept_credit_id: None,
        correction_concept_debit_id: None,
        is_pos_journal: false,
        origin_invoice: None,
        edi: EdiFields::default(),
    }
}
