//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Platform owner, allowed to manage every account
pub const ROLE_SUPERADMIN: &str = "Superadmin";

/// Role bound to every self-registered customer
pub const ROLE_CUSTOMER: &str = "Authorized Customer";

/// Delivery staff
pub const ROLE_COURIER: &str = "Courier";

/// Manages couriers and may create staff accounts
pub const ROLE_COURIER_MANAGER: &str = "Courier manager";

/// Manages a restaurant
pub const ROLE_RESTAURANT_MANAGER: &str = "Restaurant manager";

// =============================================================================
// Password Policy
// =============================================================================

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length
pub const MAX_PASSWORD_LENGTH: usize = 15;

/// Minimum generated password length
pub const MIN_GENERATED_PASSWORD_LENGTH: usize = 8;

/// Maximum generated password length
pub const MAX_GENERATED_PASSWORD_LENGTH: usize = 14;

pub const PASSWORD_DIGITS: &str = "0123456789";
pub const PASSWORD_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const PASSWORD_UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const PASSWORD_SPECIAL: &str = "@#%&!$";

// =============================================================================
// Authentication
// =============================================================================

/// Authorization header scheme for Bearer tokens
pub const BEARER_SCHEME: &str = "Bearer";

/// Default Argon2 iteration count used when no cost is configured
pub const DEFAULT_HASH_COST: u32 = 2;

// =============================================================================
// Dates
// =============================================================================

/// Display/query format for calendar dates (YYYYMMDD)
pub const DATE_LAYOUT: &str = "%Y%m%d";
