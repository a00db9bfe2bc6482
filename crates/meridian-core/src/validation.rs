//! # Validation Module
//!
//! Per-step validation for the sale wizard, plus the small input
//! validators the session boundary runs before touching the draft.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Kinds of Checks                                │
//! │                                                                         │
//! │  STEP-LEVEL (gates advancement)                                        │
//! │  ├── customer: required identity + address fields present              │
//! │  ├── products: at least one line, every qty > 0                        │
//! │  ├── delivery: deferred, or date+slot chosen and not in the past       │
//! │  └── payment:  method chosen; financing needs a positive deposit       │
//! │                                                                         │
//! │  FIELD-LEVEL ADVISORY (display only, never gates)                      │
//! │  ├── phone looks dialable                                              │
//! │  └── postcode is four digits                                           │
//! │                                                                         │
//! │  ERROR DISPLAY IS DEBOUNCED: field errors are only populated once      │
//! │  the cashier has tried to leave the step ("attempted"). Validity       │
//! │  itself never depends on the attempted flag - an empty cart is         │
//! │  invalid whether or not anyone has clicked "next" yet.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::LineItems;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Customer, DeliveryDetails, PaymentMethod};
use crate::wizard::WizardStep;

/// Result type for boundary validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Step Validation Output
// =============================================================================

/// One field-level error, addressed by the form field's camelCase key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn required(field: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: format!("{} is required", field),
        }
    }

    fn advisory(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Pass/fail plus displayable errors for one wizard step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    pub is_valid: bool,
    /// Empty until the step has been attempted.
    pub field_errors: Vec<FieldError>,
}

impl StepValidation {
    fn gated(is_valid: bool, errors: Vec<FieldError>, attempted: bool) -> Self {
        StepValidation {
            is_valid,
            field_errors: if attempted { errors } else { Vec::new() },
        }
    }
}

/// Validation results for the whole wizard.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftValidation {
    pub customer: StepValidation,
    pub products: StepValidation,
    pub delivery: StepValidation,
    pub payment: StepValidation,
    /// AND of all four steps. Ignores attempted flags entirely.
    pub is_valid: bool,
}

impl DraftValidation {
    /// The result for a single step.
    pub fn step(&self, step: WizardStep) -> &StepValidation {
        match step {
            WizardStep::Customer => &self.customer,
            WizardStep::Products => &self.products,
            WizardStep::Delivery => &self.delivery,
            WizardStep::Payment => &self.payment,
        }
    }
}

// =============================================================================
// Step Validators
// =============================================================================

/// Validates the customer step.
///
/// Step validity requires the identity and address fields to be present.
/// Phone/postcode *format* problems are advisory only: they show up in
/// `field_errors` once attempted but never flip `is_valid`.
pub fn customer_step(customer: &Customer, attempted: bool) -> StepValidation {
    let mut errors = Vec::new();
    let mut valid = true;

    let required = [
        ("firstName", customer.first_name.as_str()),
        ("lastName", customer.last_name.as_str()),
        ("phone", customer.phone.as_str()),
        ("street", customer.address.street.as_str()),
        ("city", customer.address.city.as_str()),
        ("state", customer.address.state.as_str()),
        ("postcode", customer.address.postcode.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            valid = false;
            errors.push(FieldError::required(field));
        }
    }

    // Advisory format checks - display-only, never gate the step
    if !customer.phone.trim().is_empty() && !phone_format_ok(&customer.phone) {
        errors.push(FieldError::advisory(
            "phone",
            "phone does not look like a dialable number",
        ));
    }
    if !customer.address.postcode.trim().is_empty()
        && !postcode_format_ok(&customer.address.postcode)
    {
        errors.push(FieldError::advisory("postcode", "postcode must be 4 digits"));
    }

    StepValidation::gated(valid, errors, attempted)
}

/// Validates the products step: a non-empty cart with sane quantities.
pub fn products_step(lines: &LineItems, attempted: bool) -> StepValidation {
    let mut errors = Vec::new();
    let mut valid = true;

    if lines.is_empty() {
        valid = false;
        errors.push(FieldError::advisory("lines", "add at least one product"));
    }
    if lines.lines().iter().any(|l| l.qty <= 0) {
        valid = false;
        errors.push(FieldError::advisory("lines", "every line needs a quantity"));
    }

    StepValidation::gated(valid, errors, attempted)
}

/// Validates the delivery step.
///
/// "Choose later" is always valid. Scheduling now needs both a date and
/// a time slot, and the date must not be in the past. `today` is
/// injected by the caller - this module never reads the clock.
pub fn delivery_step(
    delivery: &DeliveryDetails,
    today: NaiveDate,
    attempted: bool,
) -> StepValidation {
    if delivery.choose_later {
        return StepValidation::gated(true, Vec::new(), attempted);
    }

    let mut errors = Vec::new();
    let mut valid = true;

    match delivery.date {
        None => {
            valid = false;
            errors.push(FieldError::required("deliveryDate"));
        }
        Some(date) if date < today => {
            valid = false;
            errors.push(FieldError::advisory(
                "deliveryDate",
                "delivery date cannot be in the past",
            ));
        }
        Some(_) => {}
    }

    if delivery
        .time_slot
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        valid = false;
        errors.push(FieldError::required("timeSlot"));
    }

    StepValidation::gated(valid, errors, attempted)
}

/// Validates the payment step.
///
/// A method must be selected; financing additionally requires a positive
/// deposit (the session seeds the 30% default when financing is picked,
/// so `None` here means the cashier cleared it).
pub fn payment_step(
    method: Option<PaymentMethod>,
    deposit: Option<Money>,
    attempted: bool,
) -> StepValidation {
    let mut errors = Vec::new();
    let mut valid = true;

    match method {
        None => {
            valid = false;
            errors.push(FieldError::required("paymentMethod"));
        }
        Some(PaymentMethod::Financing) => {
            if !deposit.is_some_and(|d| d.is_positive()) {
                valid = false;
                errors.push(FieldError::advisory(
                    "depositAmount",
                    "financing requires a deposit greater than zero",
                ));
            }
        }
        Some(_) => {}
    }

    StepValidation::gated(valid, errors, attempted)
}

// =============================================================================
// Advisory Format Checks
// =============================================================================

/// Loose dialability check: optional leading `+`, then at least 8 digits
/// once spaces, dashes and parentheses are stripped.
pub fn phone_format_ok(phone: &str) -> bool {
    let trimmed = phone.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = rest
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    digits.len() >= 8 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Postcodes here are four ASCII digits.
pub fn postcode_format_ok(postcode: &str) -> bool {
    let trimmed = postcode.trim();
    trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Boundary Validators
// =============================================================================

/// Validates a SKU before it is handed to the cart.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a manually entered unit price.
///
/// The line-item store itself accepts any value; this is the UI-boundary
/// rule that keeps non-positive prices out of the cart.
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "unit price".to_string(),
        });
    }
    Ok(())
}

/// Validates an overall discount rate (0% to 100%).
pub fn validate_discount_rate(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
