//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Purchase States
// =============================================================================

/// State assigned to a purchase when none is given
pub const STATE_PENDING: &str = "pending";

/// Payment voucher received and accepted
pub const STATE_PAID: &str = "paid";

/// Handed over to the carrier
pub const STATE_SHIPPED: &str = "shipped";

/// Received by the customer
pub const STATE_DELIVERED: &str = "delivered";

/// Closed without further action
pub const STATE_COMPLETED: &str = "completed";

/// Cancelled by the store or the customer
pub const STATE_CANCELLED: &str = "cancelled";

/// Purchase states the storefront knows how to display.
///
/// Any other non-empty value is still stored; states are not a validated state machine.
pub const KNOWN_STATES: &[&str] = &[
    STATE_PENDING,
    STATE_PAID,
    STATE_SHIPPED,
    STATE_DELIVERED,
    STATE_COMPLETED,
    STATE_CANCELLED,
];

/// Check if a state value is one of the known ones
pub fn is_known_state(state: &str) -> bool {
    KNOWN_STATES.contains(&state)
}

// =============================================================================
// User Role Types
// =============================================================================

/// Role type assigned to new users
pub const ROLE_TYPE_CUSTOMER: i32 = 0;

/// Store administrator
pub const ROLE_TYPE_ADMIN: i32 = 1;

// =============================================================================
// Validation
// =============================================================================

/// Maximum length of a product code
pub const MAX_PRODUCT_CODE_LENGTH: usize = 64;

/// Minimum password length accepted by Firebase
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum number of units of one product in a single cart or purchase line
pub const MAX_LINE_QUANTITY: i64 = 999;

// =============================================================================
// Authentication
// =============================================================================

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Token type identifier returned to clients
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
