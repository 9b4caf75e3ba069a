//! Table credential generation: QR tokens and 4-digit PINs.
//!
//! Both generators take the set of values already issued in the current
//! pass and never return a member of it.

use std::collections::BTreeSet;

use rand::Rng;

/// Smallest 4-digit PIN.
const PIN_MIN: u16 = 1000;
/// Largest 4-digit PIN.
const PIN_MAX: u16 = 9999;
/// Random draws attempted before falling back to a non-numeric PIN.
pub const MAX_PIN_ATTEMPTS: usize = 200;
/// Length of the random suffix in a table token.
const TOKEN_SUFFIX_LEN: usize = 12;

/// Generates a QR token for `table_number` that is not in `taken`.
///
/// Tokens look like `table3_token_1f0c9a7b2e44`; the suffix is drawn from a
/// fresh UUID v4 and redrawn on collision.
#[must_use]
pub fn generate_token(table_number: u32, taken: &BTreeSet<String>) -> String {
    loop {
        let suffix: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(TOKEN_SUFFIX_LEN)
            .collect();
        let token = format!("table{table_number}_token_{suffix}");
        if !taken.contains(&token) {
            return token;
        }
    }
}

/// Generates a PIN for `table_number` that is not in `taken`.
///
/// Draws uniformly from `1000..=9999` up to [`MAX_PIN_ATTEMPTS`] times. If
/// every draw collides, falls back to `T<table_number>` (suffixed with
/// `-<k>` until unique), which can never clash with a numeric PIN.
pub fn generate_pin<R: Rng>(
    rng: &mut R,
    table_number: u32,
    taken: &BTreeSet<String>,
) -> String {
    for _ in 0..MAX_PIN_ATTEMPTS {
        let pin = rng.random_range(PIN_MIN..=PIN_MAX).to_string();
        if !taken.contains(&pin) {
            return pin;
        }
    }
    tracing::warn!(table_number, "pin space exhausted, issuing fallback pin");
    let base = format!("T{table_number}");
    if !taken.contains(&base) {
        return base;
    }
    let mut k: u32 = 1;
    loop {
        let candidate = format!("{base}-{k}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        k = k.saturating_add(1);
    }
}
