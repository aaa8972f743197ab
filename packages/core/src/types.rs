// ABOUTME: Entity types shared across Procura packages
// ABOUTME: Users, categories, vendors, RFPs, and quotes plus their input types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user account. `password_hash` never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name used in vendor projections: "first last", falling back
    /// to the username when both name fields are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string();
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

/// Public projection of a user, safe to return to any caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
        }
    }
}

/// Input for creating a user row. The password is already hashed by the
/// caller; storage never sees plaintext.
#[derive(Debug, Clone)]
pub struct UserCreateInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or renaming a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

/// Vendor approval workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VendorStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl VendorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Pending => "PENDING",
            VendorStatus::Approved => "APPROVED",
            VendorStatus::Rejected => "REJECTED",
            VendorStatus::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(VendorStatus::Pending),
            "APPROVED" => Some(VendorStatus::Approved),
            "REJECTED" => Some(VendorStatus::Rejected),
            "SUSPENDED" => Some(VendorStatus::Suspended),
            _ => None,
        }
    }
}

/// A vendor profile, owned one-to-one by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub user_id: String,
    pub revenue: f64,
    pub employee_count: i64,
    pub gst_number: String,
    pub gst_image: Option<String>,
    pub pan_number: String,
    pub pan_image: Option<String>,
    pub mobile_number: String,
    pub category_id: Option<String>,
    pub status: VendorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vendor projection enriched with the owning user's identity fields,
/// as returned by the administrative endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorDetail {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub revenue: f64,
    pub employee_count: i64,
    pub gst_number: String,
    pub gst_image: Option<String>,
    pub pan_number: String,
    pub pan_image: Option<String>,
    pub mobile_number: String,
    pub category_id: Option<String>,
    pub status: VendorStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal projection for the public vendor directory: id and display name
/// only, nothing else leaves the server on that endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorDirectoryEntry {
    pub id: String,
    pub vendor_name: String,
}

/// Payload for public vendor self-registration: user identity plus the
/// vendor profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorRegistrationInput {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    pub gst_number: String,
    #[serde(default)]
    pub gst_image: Option<String>,
    pub pan_number: String,
    #[serde(default)]
    pub pan_image: Option<String>,
    pub mobile_number: String,
    #[serde(default = "default_employee_count")]
    pub employee_count: i64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub category_id: Option<String>,
}

fn default_employee_count() -> i64 {
    1
}

/// Input for an admin creating a vendor profile for an existing user.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorCreateInput {
    pub user_id: String,
    pub gst_number: String,
    #[serde(default)]
    pub gst_image: Option<String>,
    pub pan_number: String,
    #[serde(default)]
    pub pan_image: Option<String>,
    pub mobile_number: String,
    #[serde(default = "default_employee_count")]
    pub employee_count: i64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Partial update of a vendor profile; `None` leaves a field untouched.
/// `category_id` distinguishes "absent" (untouched) from explicit `null`
/// (clear the category).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorUpdateInput {
    pub revenue: Option<f64>,
    pub employee_count: Option<i64>,
    pub gst_number: Option<String>,
    pub gst_image: Option<String>,
    pub pan_number: Option<String>,
    pub pan_image: Option<String>,
    pub mobile_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<String>>,
    pub status: Option<VendorStatus>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A request-for-proposal published within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rfp {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub last_date: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub category_id: String,
    pub assigned_vendor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full RFP payload; used for both create and replace-style update. The
/// assigned vendor is required and must belong to the RFP's category.
#[derive(Debug, Clone, Deserialize)]
pub struct RfpInput {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub last_date: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub category_id: String,
    pub assigned_vendor_id: String,
}

/// A vendor's priced response to an RFP, with the vendor display name and
/// RFP name resolved for the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDetail {
    pub id: String,
    pub rfp_id: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub rfp_name: String,
    pub price: f64,
    pub quantity: i64,
    pub description: String,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// Quote submission payload. The vendor identity is never part of the
/// payload; it is always taken from the authenticated caller.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteCreateInput {
    pub rfp_id: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteUpdateInput {
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
    pub total_cost: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        let user = User {
            id: "user-1".to_string(),
            username: "acme".to_string(),
            email: "a@b.c".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            password_hash: String::new(),
            is_staff: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.display_name(), "Asha Rao");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User {
            id: "user-1".to_string(),
            username: "acme".to_string(),
            email: "a@b.c".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            is_staff: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.display_name(), "acme");
    }

    #[test]
    fn test_vendor_status_round_trip() {
        for status in [
            VendorStatus::Pending,
            VendorStatus::Approved,
            VendorStatus::Rejected,
            VendorStatus::Suspended,
        ] {
            assert_eq!(VendorStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(VendorStatus::parse("UNKNOWN"), None);
    }

    #[test]
    fn test_vendor_status_serializes_screaming() {
        let json = serde_json::to_string(&VendorStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }
}
