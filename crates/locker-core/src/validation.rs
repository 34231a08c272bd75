//! # Validation Module
//!
//! Input rules for Locker, checked before any state is touched.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: HTTP extractor (axum Json / Path)                            │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths                                          │
//! │  ├── Money and stock within 0..=cap                                    │
//! │  └── Quantity range 1..=999                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (stock >= 0), CHECK (quantity >= 1)                         │
//! │  ├── UNIQUE (barcode), UNIQUE (username)                               │
//! │  └── FOREIGN KEY ... ON DELETE CASCADE                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use locker_core::validation::{validate_barcode, validate_quantity};
//!
//! assert!(validate_barcode("123456789").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{ContactDetails, NewVariant};
use crate::{ALLOWED_PHOTO_EXTENSIONS, MAX_ITEM_QUANTITY, MAX_MONEY_CENTS, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_BARCODE_LEN: usize = 64;
const MAX_LABEL_LEN: usize = 50;
const MAX_CONTACT_LEN: usize = 200;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 8;

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog
// =============================================================================

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("name", name, MAX_NAME_LEN)
}

/// Validates a barcode.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No whitespace inside (scanners emit a single token)
///
/// ```rust
/// use locker_core::validation::validate_barcode;
///
/// assert!(validate_barcode("987654321").is_ok());
/// assert!(validate_barcode("  ").is_err());
/// assert!(validate_barcode("12 34").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    required("barcode", barcode, MAX_BARCODE_LEN)?;

    if barcode.trim().chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

fn bounded(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

/// Validates a monetary amount in cents: 0 to MAX_MONEY_CENTS.
pub fn validate_money_cents(field: &str, cents: i64) -> ValidationResult<()> {
    bounded(field, cents, MAX_MONEY_CENTS)
}

/// Validates an absolute stock level: 0 to MAX_STOCK.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    bounded("stock", stock, MAX_STOCK)
}

/// Error for a restock that would push stock past MAX_STOCK.
pub fn stock_overflow() -> ValidationError {
    ValidationError::OutOfRange {
        field: "stock".to_string(),
        min: 0,
        max: MAX_STOCK,
    }
}

/// Validates every field of a variant draft.
///
/// The trimmed barcode, type and size are what get stored.
pub fn validate_new_variant(draft: &NewVariant) -> ValidationResult<()> {
    validate_barcode(&draft.barcode)?;
    required("type", &draft.variant_type, MAX_LABEL_LEN)?;
    required("size", &draft.size, MAX_LABEL_LEN)?;
    validate_money_cents("cost", draft.cost_cents)?;
    validate_money_cents("selling_price", draft.selling_price_cents)?;
    validate_stock(draft.stock)?;

    if let Some(photo) = &draft.photo {
        validate_photo_ref(photo)?;
    }

    Ok(())
}

// =============================================================================
// Quantities
// =============================================================================

/// Validates a restock or pre-order quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Customer forms
// =============================================================================

/// Validates the contact details of a customer request or pre-order.
pub fn validate_contact(details: &ContactDetails) -> ValidationResult<()> {
    required("customer_name", &details.customer_name, MAX_CONTACT_LEN)?;
    required("contact_info", &details.contact_info, MAX_CONTACT_LEN)
}

// =============================================================================
// Users
// =============================================================================

/// Validates a username: 3 to 50 characters, no whitespace.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    let len = username.chars().count();
    if len < MIN_USERNAME_LEN {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: MIN_USERNAME_LEN,
        });
    }
    if len > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a new password. Only length is enforced.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Assets
// =============================================================================

/// Returns the lowercase photo extension if the file name is an accepted
/// image type.
///
/// ```rust
/// use locker_core::validation::photo_extension;
///
/// assert_eq!(photo_extension("Jersey.PNG").unwrap(), "png");
/// assert!(photo_extension("notes.txt").is_err());
/// assert!(photo_extension("noext").is_err());
/// ```
pub fn photo_extension(file_name: &str) -> ValidationResult<String> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ValidationError::NotAllowed {
            field: "photo".to_string(),
            allowed: ALLOWED_PHOTO_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        });
    }

    Ok(ext)
}

/// Validates a stored photo reference.
///
/// A reference is a bare file name: no separators, no parent hops.
pub fn validate_photo_ref(photo: &str) -> ValidationResult<()> {
    if photo.is_empty() {
        return Err(ValidationError::Required {
            field: "photo".to_string(),
        });
    }

    if photo.contains('/') || photo.contains('\\') || photo.contains("..") {
        return Err(ValidationError::InvalidFormat {
            field: "photo".to_string(),
            reason: "must be a plain file name".to_string(),
        });
    }

    Ok(())
}
