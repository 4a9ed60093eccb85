//! Valor en letras: Spanish cardinal numbers for the printed invoice.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::Currency;

const UNITS: [&str; 30] = [
    "cero", "uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve",
    "diez", "once", "doce", "trece", "catorce", "quince", "dieciséis", "diecisiete", "dieciocho", "diecinueve",
    "veinte", "veintiuno", "veintidós", "veintitrés", "veinticuatro", "veinticinco", "veintiséis", "veintisiete",
    "veintiocho", "veintinueve",
];

const TENS: [&str; 10] = [
    "", "", "", "treinta", "cuarenta", "cincuenta", "sesenta", "setenta", "ochenta", "noventa",
];

const HUNDREDS: [&str; 10] = [
    "", "ciento", "doscientos", "trescientos", "cuatrocientos", "quinientos", "seiscientos", "setecientos",
    "ochocientos", "novecientos",
];

const THOUSAND: u64 = 1_000;
const MILLION: u64 = 1_000_000;
const BILLION: u64 = 1_000_000_000_000;

/// Largest power of ten that still fits the `u64` word conversion.
const MAX_DECIMAL_PLACES: u32 = 18;

fn below_hundred(n: u64) -> String {
    if n < 30 {
        return UNITS[n as usize].to_string();
    }
    let (tens, units) = (n / 10, n % 10);
    if units == 0 {
        TENS[tens as usize].to_string()
    } else {
        format!("{} y {}", TENS[tens as usize], UNITS[units as usize])
    }
}

fn below_thousand(n: u64) -> String {
    if n == 100 {
        return "cien".to_string();
    }
    let (hundreds, rest) = (n / 100, n % 100);
    match (hundreds, rest) {
        (0, r) => below_hundred(r),
        (h, 0) => HUNDREDS[h as usize].to_string(),
        (h, r) => format!("{} {}", HUNDREDS[h as usize], below_hundred(r)),
    }
}

/// "uno" loses its last vowel before "mil", "millones" and "billones".
fn apocope(words: String) -> String {
    if let Some(stem) = words.strip_suffix("veintiuno") {
        format!("{}veintiún", stem)
    } else if let Some(stem) = words.strip_suffix("uno") {
        format!("{}un", stem)
    } else {
        words
    }
}

fn join(head: String, rest: u64) -> String {
    if rest == 0 {
        head
    } else {
        format!("{} {}", head, to_words(rest))
    }
}

/// Lower-case Spanish words for `n`.
pub fn to_words(n: u64) -> String {
    if n < THOUSAND {
        return below_thousand(n);
    }
    if n < MILLION {
        let (thousands, rest) = (n / THOUSAND, n % THOUSAND);
        let head = if thousands == 1 {
            "mil".to_string()
        } else {
            format!("{} mil", apocope(to_words(thousands)))
        };
        return join(head, rest);
    }
    if n < BILLION {
        let (millions, rest) = (n / MILLION, n % MILLION);
        let head = if millions == 1 {
            "un millón".to_string()
        } else {
            format!("{} millones", apocope(to_words(millions)))
        };
        return join(head, rest);
    }
    let (billions, rest) = (n / BILLION, n % BILLION);
    let head = if billions == 1 {
        "un billón".to_string()
    } else {
        format!("{} billones", apocope(to_words(billions)))
    };
    join(head, rest)
}

/// `CIENTO DIECINUEVE MIL PESOS`, with `, <CENTAVOS>.` appended when the
/// amount has a fractional part. Empty when the integer part is zero.
pub fn amount_in_words(amount: Decimal, currency: &Currency) -> String {
    let amount = amount.abs();
    let integer_part = amount.trunc().to_u64().unwrap_or(0);
    if integer_part == 0 {
        return String::new();
    }

    let scale = Decimal::from(10u64.pow(currency.decimal_places.min(MAX_DECIMAL_PLACES)));
    let decimal_part = (amount.fract() * scale).round().to_u64().unwrap_or(0);

    let mut words = format!(
        "{} {}",
        to_words(integer_part).to_uppercase(),
        currency.unit_label.to_uppercase()
    );
    if decimal_part > 0 {
        words.push_str(&format!(
            ", {} {}.",
            to_words(decimal_part).to_uppercase(),
            currency.subunit_label.to_uppercase()
        ));
    }
    words
}
