//! # Validation Module
//!
//! Input validation rules for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Presentation layer                                        │
//! │  ├── Basic format checks (empty fields, quantity pickers)           │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: Store facade actions                                      │
//! │  └── THIS MODULE: quantity, stock, and required-field rules,        │
//! │      applied BEFORE an event is dispatched                          │
//! │                                                                     │
//! │  The reducer below both layers trusts its input and never           │
//! │  validates: malformed input must not reach it.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::Product;

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be a positive integer (>= 1)
///
/// ## Example
/// ```rust
/// use bazaar_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(-3).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates that a requested quantity fits within a product's stock,
/// accounting for what is already in the cart.
pub fn validate_stock(product: &Product, already_in_cart: i64, requested: i64) -> ValidationResult<()> {
    let total = already_in_cart + requested;
    if total > product.stock_quantity {
        return Err(ValidationError::InsufficientStock {
            name: product.name.clone(),
            available: product.stock_quantity,
            requested: total,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field (email, password, display name).
///
/// ## Rules
/// - Must not be empty after trimming
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product submitted through the admin surface.
///
/// ## Rules
/// - Name must not be empty
/// - Price must not be negative
/// - Stock must not be negative
pub fn validate_product_fields(
    name: &str,
    price_cents: i64,
    stock_quantity: i64,
) -> ValidationResult<()> {
    validate_required("name", name)?;

    if price_cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    if stock_quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stockQuantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn product(stock: i64) -> Product {
        Product {
            id: "1".to_string(),
            name: "Classic White Shirt".to_string(),
            price_cents: 2599,
            image_url: String::new(),
            category: Category::Men,
            description: String::new(),
            stock_quantity: stock,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(99).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stock_counts_existing_cart_lines() {
        let p = product(5);

        assert!(validate_stock(&p, 0, 5).is_ok());
        assert!(validate_stock(&p, 3, 2).is_ok());
        assert!(validate_stock(&p, 3, 3).is_err());
    }

    #[test]
    fn test_validate_stock_error_carries_context() {
        let p = product(2);
        let err = validate_stock(&p, 1, 2).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientStock {
                name: "Classic White Shirt".to_string(),
                available: 2,
                requested: 3,
            }
        );
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("email", "user@example.com").is_ok());
        assert!(validate_required("email", "").is_err());
        assert!(validate_required("email", "   ").is_err());
    }

    #[test]
    fn test_validate_product_fields() {
        assert!(validate_product_fields("Shirt", 2599, 10).is_ok());
        assert!(validate_product_fields("", 2599, 10).is_err());
        assert!(validate_product_fields("Shirt", -1, 10).is_err());
        assert!(validate_product_fields("Shirt", 2599, -1).is_err());
    }
}
