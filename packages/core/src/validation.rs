// ABOUTME: Request payload validation for Procura entities
// ABOUTME: Field-scoped checks that run before any storage access

use crate::types::{QuoteCreateInput, RfpInput, VendorRegistrationInput};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validation errors carry the offending field so API responses can be
/// keyed by field name.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn require(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, format!("{} is required", field)));
    }
}

fn check_email(errors: &mut Vec<ValidationError>, email: &str) {
    if email.trim().is_empty() {
        errors.push(ValidationError::new("email", "email is required"));
    } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        errors.push(ValidationError::new("email", "Enter a valid email address"));
    }
}

fn check_password(errors: &mut Vec<ValidationError>, password: &str) {
    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(ValidationError::new(
            "password",
            format!(
                "Ensure this field has at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
}

/// Validates the shape of a vendor registration payload. Uniqueness against
/// existing records is checked by the storage layer.
pub fn validate_vendor_registration(data: &VendorRegistrationInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require(&mut errors, "username", &data.username);
    check_email(&mut errors, &data.email);
    check_password(&mut errors, &data.password);
    require(&mut errors, "gst_number", &data.gst_number);
    require(&mut errors, "pan_number", &data.pan_number);
    require(&mut errors, "mobile_number", &data.mobile_number);

    if data.employee_count < 1 {
        errors.push(ValidationError::new(
            "employee_count",
            "employee_count must be at least 1",
        ));
    }
    if data.revenue < 0.0 {
        errors.push(ValidationError::new("revenue", "revenue cannot be negative"));
    }

    errors
}

/// Validates an admin registration payload (username, email, password).
pub fn validate_admin_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require(&mut errors, "username", username);
    check_email(&mut errors, email);
    check_password(&mut errors, password);

    errors
}

/// Validates an RFP payload. The assigned-vendor/category cross-check needs
/// storage lookups and lives in the storage layer.
pub fn validate_rfp_input(data: &RfpInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require(&mut errors, "name", &data.name);
    require(&mut errors, "description", &data.description);

    if data.quantity < 0 {
        errors.push(ValidationError::new("quantity", "quantity cannot be negative"));
    }
    if data.min_price < 0.0 {
        errors.push(ValidationError::new("min_price", "min_price cannot be negative"));
    }
    if data.max_price < data.min_price {
        errors.push(ValidationError::new(
            "max_price",
            "max_price cannot be lower than min_price",
        ));
    }

    errors
}

/// Validates a quote submission payload.
pub fn validate_quote_input(data: &QuoteCreateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require(&mut errors, "rfp_id", &data.rfp_id);

    if data.price < 0.0 {
        errors.push(ValidationError::new("price", "price cannot be negative"));
    }
    if data.quantity < 0 {
        errors.push(ValidationError::new("quantity", "quantity cannot be negative"));
    }
    if data.total_cost < 0.0 {
        errors.push(ValidationError::new(
            "total_cost",
            "total_cost cannot be negative",
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> VendorRegistrationInput {
        VendorRegistrationInput {
            username: "acme".to_string(),
            email: "acme@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password: "hunter2hunter2".to_string(),
            gst_number: "GST123".to_string(),
            gst_image: None,
            pan_number: "PAN123".to_string(),
            pan_image: None,
            mobile_number: "9876543210".to_string(),
            employee_count: 1,
            revenue: 0.0,
            category_id: None,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(validate_vendor_registration(&registration()).is_empty());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut data = registration();
        data.password = "short".to_string();

        let errors = validate_vendor_registration(&data);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut data = registration();
        data.email = "not-an-email".to_string();

        let errors = validate_vendor_registration(&data);
        assert!(errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn test_missing_unique_fields_each_reported() {
        let mut data = registration();
        data.gst_number = String::new();
        data.pan_number = "  ".to_string();
        data.mobile_number = String::new();

        let errors = validate_vendor_registration(&data);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"gst_number"));
        assert!(fields.contains(&"pan_number"));
        assert!(fields.contains(&"mobile_number"));
    }

    #[test]
    fn test_rfp_price_band_checked() {
        let data = RfpInput {
            name: "Laptops".to_string(),
            description: "Bulk order".to_string(),
            quantity: 10,
            last_date: chrono::NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            min_price: 500.0,
            max_price: 100.0,
            category_id: "cat-1".to_string(),
            assigned_vendor_id: "vendor-1".to_string(),
        };

        let errors = validate_rfp_input(&data);
        assert!(errors.iter().any(|e| e.field == "max_price"));
    }
}
