//! # Validation Module
//!
//! Input validation utilities for Mato POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE constraints (customer phone)                               │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart line editors deliberately bypass this module - mid-entry
//! text like "12." must never bounce back at the cashier. Validation
//! applies to committed input: checkout fields, ledger postings, names.

use crate::error::ValidationError;
use crate::money::Money;
use crate::{AUTOCOMPLETE_MIN_CHARS, MAX_LOG_TEXT, MAX_NAME_LEN, MAX_PHONE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer phone key.
///
/// ## Rules
/// - Must not be empty
/// - At most 30 characters
/// - Digits, spaces, `+` and `-` only
///
/// ## Returns
/// The trimmed phone string.
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > MAX_PHONE_LEN {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: MAX_PHONE_LEN,
        });
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, + and -".to_string(),
        });
    }

    Ok(phone.to_string())
}

/// Validates a product or customer display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a logbook entry or manual-credit note.
///
/// ## Rules
/// - Must not be empty
/// - At most 2000 characters
pub fn validate_log_text(text: &str) -> ValidationResult<String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "text".to_string(),
        });
    }

    if text.len() > MAX_LOG_TEXT {
        return Err(ValidationError::TooLong {
            field: "text".to_string(),
            max: MAX_LOG_TEXT,
        });
    }

    Ok(text.to_string())
}

/// Whether a typed query is long enough to trigger autocomplete.
///
/// Search kicks in at two characters so a single keystroke doesn't
/// match half the catalog.
pub fn autocomplete_ready(query: &str) -> bool {
    query.trim().chars().count() >= AUTOCOMPLETE_MIN_CHARS
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates a posted monetary amount (payment, manual credit, SHS
/// tendered).
///
/// ## Rules
/// - Must parse as a decimal number
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use mato_core::validation::validate_amount;
///
/// assert_eq!(validate_amount("payment", "12.50").unwrap().cents(), 1250);
/// assert!(validate_amount("payment", "0").is_err());
/// assert!(validate_amount("payment", "abc").is_err());
/// ```
pub fn validate_amount(field: &str, raw: &str) -> ValidationResult<Money> {
    let amount = Money::parse(raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a number".to_string(),
    })?;

    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(amount)
}

/// Validates a price or cost in cents (zero allowed, free items exist).
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
