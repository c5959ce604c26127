//! Fixed-pattern extraction of the two fields the submitter cares about.
//!
//! This is deliberately not a JSON decoder. The success token is matched as a
//! raw substring anywhere in the body, and the gas value is a digit run read
//! after the first `"gasUsed":` key. Bodies that a structural parser would
//! reject can still classify as success here, and the other way round.

const SUCCESS_TOKEN: &str = r#""ok":true"#;
const GAS_KEY: &str = r#""gasUsed":"#;

/// Sentinel reported for an unknown gas value.
pub const GAS_UNKNOWN: i64 = -1;

/// Result of scanning a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedResponse {
    pub ok: bool,
    pub gas_used: Option<u64>,
}

impl ParsedResponse {
    /// Gas as the wire-level integer, `-1` when unknown.
    pub fn gas_or_sentinel(&self) -> i64 {
        self.gas_used
            .map(|gas| i64::try_from(gas).unwrap_or(i64::MAX))
            .unwrap_or(GAS_UNKNOWN)
    }
}

pub fn parse_response(body: &str) -> ParsedResponse {
    ParsedResponse {
        ok: body.contains(SUCCESS_TOKEN),
        gas_used: scan_gas_used(body),
    }
}

/// Digits after the first `"gasUsed":`, skipping spaces and double quotes.
/// Stops at the first non-digit, so `-5` yields nothing and `1.5e3` yields 1.
/// Values past `u64::MAX` saturate.
fn scan_gas_used(body: &str) -> Option<u64> {
    let start = body.find(GAS_KEY)? + GAS_KEY.len();
    let digits = body[start..]
        .trim_start_matches([' ', '"'])
        .bytes()
        .take_while(u8::is_ascii_digit);

    let mut value: Option<u64> = None;
    for digit in digits {
        let acc = value.unwrap_or(0);
        value = Some(acc.saturating_mul(10).saturating_add(u64::from(digit - b'0')));
    }
    value
}
