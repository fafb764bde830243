//! # Error Types
//!
//! Domain-specific error types for sales-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sales-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input / configuration validation failures      │
//! │                                                                         │
//! │  sales-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  bonus-report errors (app)                                             │
//! │  └── ConfigError      - Environment configuration failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → anyhow (main)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - A missing fixed-bonus key contributes zero.
//! - An achievement rate below every tier contributes zero.
//! - A zero target yields a zero achievement rate.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A team member's target record failed validation.
    ///
    /// ## When This Occurs
    /// - `calculate_team` meets a record with a negative figure
    /// - The salesperson ID is not a UUID
    #[error("Invalid target for sales person {sales_person_id}: {source}")]
    InvalidTarget {
        sales_person_id: String,
        #[source]
        source: ValidationError,
    },

    /// A decimal amount does not fit into integer cents.
    #[error("Amount {amount} cannot be represented in cents")]
    AmountOverflow { amount: String },

    /// A bonus or team total exceeds the representable range.
    ///
    /// ## When This Occurs
    /// - `new_customers × per_new_customer` is beyond `Decimal::MAX`
    /// - Summed team figures are beyond `i64` cents
    #[error("Arithmetic overflow computing {what}")]
    Overflow { what: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an Overflow error naming the figure being computed.
    pub fn overflow(what: impl Into<String>) -> Self {
        CoreError::Overflow { what: what.into() }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs, and for checking
/// tier schedules before they are written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid period).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A bounded tier whose upper bound does not exceed its lower bound.
    #[error("Tier [{min_bps}, {max_bps}) bps is empty: max must exceed min")]
    EmptyTier { min_bps: u32, max_bps: u32 },

    /// Two tiers of the same schedule cover a common rate.
    #[error("Tiers starting at {lower_min_bps} and {upper_min_bps} bps overlap")]
    OverlappingTiers { lower_min_bps: u32, upper_min_bps: u32 },

    /// Consecutive tiers leave a rate range uncovered.
    #[error("No tier covers rates from {from_bps} to {to_bps} bps")]
    TierGap { from_bps: u32, to_bps: u32 },

    /// An unbounded tier is followed by another tier.
    #[error("Unbounded tier starting at {min_bps} bps must be the last tier")]
    UnboundedTierNotLast { min_bps: u32 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
