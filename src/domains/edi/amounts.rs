//! Monetary aggregates of an invoice: withholdings, excluded base, totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::words::amount_in_words;
use crate::models::{Invoice, Tax};

/// One tax applied to the invoice, summed over its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLineSummary {
    pub tax: Tax,
    pub base: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceAmounts {
    pub amount_untaxed: Decimal,
    pub amount_tax: Decimal,
    pub amount_total: Decimal,
    pub amount_tax_withholding: Decimal,
    pub amount_tax_no_withholding: Decimal,
    pub amount_total_no_withholding: Decimal,
    pub amount_excluded: Decimal,
    pub value_letters: String,
    pub tax_lines: Vec<TaxLineSummary>,
}

pub fn tax_lines(invoice: &Invoice) -> Vec<TaxLineSummary> {
    let mut summaries: Vec<TaxLineSummary> = Vec::new();
    for line in invoice.lines.iter().filter(|l| l.account_id.is_some()) {
        for tax in &line.taxes {
            let amount = tax.compute(line.price_subtotal, line.quantity);
            match summaries.iter_mut().find(|s| s.tax.id == tax.id) {
                Some(summary) => {
                    summary.base += line.price_subtotal;
                    summary.amount += amount;
                }
                None => summaries.push(TaxLineSummary {
                    tax: tax.clone(),
                    base: line.price_subtotal,
                    amount,
                }),
            }
        }
    }
    summaries
}

pub fn compute(invoice: &Invoice) -> InvoiceAmounts {
    let amount_untaxed: Decimal = invoice
        .lines
        .iter()
        .filter(|l| l.account_id.is_some())
        .map(|l| l.price_subtotal)
        .sum();

    let tax_lines = tax_lines(invoice);

    let mut amount_tax = Decimal::ZERO;
    let mut amount_tax_withholding = Decimal::ZERO;
    let mut amount_tax_no_withholding = Decimal::ZERO;
    let mut amount_excluded = Decimal::ZERO;

    for summary in &tax_lines {
        amount_tax += summary.amount;
        if summary.tax.is_excluded() {
            amount_excluded += summary.base;
        } else if summary.tax.is_withholding() {
            amount_tax_withholding += summary.amount;
        } else {
            amount_tax_no_withholding += summary.amount;
        }
    }

    let amount_total = amount_untaxed + amount_tax;

    InvoiceAmounts {
        amount_untaxed,
        amount_tax,
        amount_total,
        amount_tax_withholding,
        amount_tax_no_withholding,
        amount_total_no_withholding: amount_untaxed + amount_tax_no_withholding,
        amount_excluded,
        value_letters: amount_in_words(amount_total, &invoice.currency),
        tax_lines,
    }
}
