//! # Validation Module
//!
//! Input validation for targets and bonus configuration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms (TypeScript)                                 │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── validate_target: every figure >= 0                                │
//! │  └── validate_tier_schedule: no overlaps, no gaps                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite CHECK / UNIQUE constraints)                 │
//! │                                                                         │
//! │  The calculator itself stays total: a malformed schedule still         │
//! │  yields a result (first band by ascending min_rate wins).              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sales_core::types::{BonusTier, Metric, Percentage};
//! use sales_core::validation::validate_tier_schedule;
//!
//! let tiers = vec![
//!     BonusTier::new(Metric::Sales, Percentage::from_percent(0), Some(Percentage::from_percent(80)), Percentage::from_percent(2)),
//!     BonusTier::new(Metric::Sales, Percentage::from_percent(80), None, Percentage::from_percent(4)),
//! ];
//! assert!(validate_tier_schedule(&tiers).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{BonusTier, Target};
use crate::{MAX_BONUS_RATE_BPS, MAX_FIXED_BONUS_KEY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a salesperson identifier (UUID, as issued by the identity
/// provider).
///
/// ## Example
/// ```rust
/// use sales_core::validation::validate_sales_person_id;
///
/// assert!(validate_sales_person_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_sales_person_id("").is_err());
/// assert!(validate_sales_person_id("bob").is_err());
/// ```
pub fn validate_sales_person_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sales_person_id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "sales_person_id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a fixed bonus key.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Lowercase letters, digits and underscores only (`per_new_customer`)
pub fn validate_fixed_bonus_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "key".to_string(),
        });
    }

    if key.len() > MAX_FIXED_BONUS_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "key".to_string(),
            max: MAX_FIXED_BONUS_KEY_LEN,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "key".to_string(),
            reason: "must contain only lowercase letters, digits, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a money amount is not negative. Zero is allowed.
pub fn validate_non_negative_money(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates that a count is not negative. Zero is allowed.
pub fn validate_non_negative_count(field: &str, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a commission rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100% of the achieved amount)
pub fn validate_bonus_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_BONUS_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "bonus_rate".to_string(),
            min: 0,
            max: i64::from(MAX_BONUS_RATE_BPS),
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a target record before calculation or storage.
///
/// ## User Workflow
/// ```text
/// Manager records actuals
///      │
///      ▼
/// validate_target() ← THIS FUNCTION
///      │
///      ├── any figure < 0? → Error: "achieved_sales must not be negative"
///      │
///      └── OK → calculate_bonus / repository write
/// ```
pub fn validate_target(target: &Target) -> ValidationResult<()> {
    validate_sales_person_id(&target.sales_person_id)?;

    let amounts = [
        ("sales_target", target.sales_target),
        ("achieved_sales", target.achieved_sales),
        ("collection_target", target.collection_target),
        ("achieved_collection", target.achieved_collection),
    ];
    for (field, amount) in amounts {
        validate_non_negative_money(field, amount)?;
    }

    let counts = [
        ("unit_target", target.unit_target),
        ("achieved_units", target.achieved_units),
        ("new_customer_target", target.new_customer_target),
        ("achieved_new_customers", target.achieved_new_customers),
    ];
    for (field, count) in counts {
        validate_non_negative_count(field, count)?;
    }

    Ok(())
}

/// Validates a single tier on its own.
///
/// ## Rules
/// - A bounded tier must have `max_rate > min_rate`
/// - The bonus rate must be within 0-100%
pub fn validate_tier(tier: &BonusTier) -> ValidationResult<()> {
    if let Some(max) = tier.max_rate {
        if max <= tier.min_rate {
            return Err(ValidationError::EmptyTier {
                min_bps: tier.min_rate.bps(),
                max_bps: max.bps(),
            });
        }
    }

    validate_bonus_rate_bps(tier.bonus_rate.bps())
}

/// Validates a whole schedule (all tiers of one metric).
///
/// Checks the schedule in ascending `min_rate` order:
/// - each tier is valid on its own
/// - an unbounded tier can only be the last one
/// - consecutive tiers neither overlap nor leave a gap
///
/// The range below the lowest `min_rate` is allowed to be uncovered; rates
/// there earn no tier bonus.
pub fn validate_tier_schedule(tiers: &[BonusTier]) -> ValidationResult<()> {
    let mut ordered: Vec<&BonusTier> = tiers.iter().collect();
    ordered.sort_by_key(|t| t.min_rate);

    for tier in &ordered {
        validate_tier(tier)?;
    }

    for pair in ordered.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);

        let Some(lower_max) = lower.max_rate else {
            return Err(ValidationError::UnboundedTierNotLast {
                min_bps: lower.min_rate.bps(),
            });
        };

        if upper.min_rate < lower_max {
            return Err(ValidationError::OverlappingTiers {
                lower_min_bps: lower.min_rate.bps(),
                upper_min_bps: upper.min_rate.bps(),
            });
        }

        if upper.min_rate > lower_max {
            return Err(ValidationError::TierGap {
                from_bps: lower_max.bps(),
                to_bps: upper.min_rate.bps(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
