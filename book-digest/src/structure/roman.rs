//! Roman numeral conversion for PART and section headers.

const NUMERALS: &[(u32, &str)] = &[
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Parse a canonical upper-case roman numeral.
///
/// Only the canonical spelling of a value is accepted, so words made of
/// numeral letters ("CIVIL", "LIVID") and sloppy forms ("IIII") are rejected.
pub fn parse(token: &str) -> Option<u32> {
    if token.is_empty() || token.len() > 15 {
        return None;
    }

    let mut value = 0;
    let mut rest = token;
    while !rest.is_empty() {
        let (n, symbol) = NUMERALS.iter().find(|(_, s)| rest.starts_with(s))?;
        value += n;
        rest = &rest[symbol.len()..];
    }

    (to_roman(value) == token).then_some(value)
}

/// Render a value as a canonical roman numeral (empty for zero).
pub fn to_roman(mut value: u32) -> String {
    let mut out = String::new();
    for (n, symbol) in NUMERALS {
        while value >= *n {
            out.push_str(symbol);
            value -= n;
        }
    }
    out
}
