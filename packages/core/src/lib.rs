// ABOUTME: Core types, traits, and utilities for Procura
// ABOUTME: Foundational package providing shared functionality across all Procura packages

pub mod ids;
pub mod types;
pub mod validation;

// Re-export main types
pub use types::{
    Category, CategoryInput, PublicUser, QuoteCreateInput, QuoteDetail, QuoteUpdateInput, Rfp,
    RfpInput, User, UserCreateInput, Vendor, VendorCreateInput, VendorDetail,
    VendorDirectoryEntry, VendorRegistrationInput, VendorStatus, VendorUpdateInput,
};

// Re-export utilities
pub use ids::{category_id, mail_id, quote_id, reset_id, rfp_id, user_id, vendor_id};

// Re-export validation
pub use validation::{
    validate_admin_registration, validate_quote_input, validate_rfp_input,
    validate_vendor_registration, ValidationError,
};
