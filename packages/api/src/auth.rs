// ABOUTME: Caller identity extraction and the capability policy check
// ABOUTME: Every handler receives an explicit Caller and gates on a capability set

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use procura_storage::StorageError;

use crate::error::ApiError;
use crate::state::ApiState;

/// The caller's linked vendor profile, loaded fresh from storage on every
/// request so a deleted or re-categorized vendor is reflected immediately.
#[derive(Debug, Clone)]
pub struct VendorIdentity {
    pub id: String,
    pub category_id: Option<String>,
}

/// The identity making a request: anonymous, vendor, or admin. Passed
/// explicitly into handler logic, never read from ambient state.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub staff: bool,
    pub vendor: Option<VendorIdentity>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The caller's vendor link, or an authorization error. Used by
    /// handlers that already passed a Vendor capability check.
    pub fn require_vendor(&self) -> Result<&VendorIdentity, ApiError> {
        self.vendor.as_ref().ok_or(ApiError::Forbidden)
    }
}

/// Capabilities a policy check evaluates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Admin,
    Vendor,
}

pub const ADMIN_ONLY: &[Capability] = &[Capability::Admin];
pub const VENDOR_ONLY: &[Capability] = &[Capability::Vendor];
pub const ADMIN_OR_VENDOR: &[Capability] = &[Capability::Admin, Capability::Vendor];

/// Single policy gate for all handlers. Anonymous callers fail with
/// authentication-required; authenticated callers holding none of the
/// required capabilities fail with authorization-denied. Handlers call this
/// before touching storage, so nothing is mutated on denial.
pub fn authorize(caller: &Caller, required: &[Capability]) -> Result<(), ApiError> {
    if !caller.authenticated {
        return Err(ApiError::AuthenticationRequired);
    }

    let allowed = required.iter().any(|capability| match capability {
        Capability::Admin => caller.staff,
        Capability::Vendor => caller.vendor.is_some(),
    });

    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

impl FromRequestParts<ApiState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header_value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Caller::anonymous());
        };

        let token = header_value
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::AuthenticationRequired)?;

        let claims = state
            .signer
            .verify(token)
            .map_err(|_| ApiError::AuthenticationRequired)?;

        // The token names the user; storage is the authority on role and
        // vendor link.
        let user = match state.db.user_storage.get_user(&claims.sub).await {
            Ok(user) => user,
            Err(StorageError::NotFound) => return Err(ApiError::AuthenticationRequired),
            Err(other) => return Err(other.into()),
        };

        let vendor = state
            .db
            .vendor_storage
            .get_by_user_id(&user.id)
            .await?
            .map(|vendor| VendorIdentity {
                id: vendor.id,
                category_id: vendor.category_id,
            });

        Ok(Caller {
            authenticated: true,
            user_id: Some(user.id),
            staff: user.is_staff,
            vendor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Caller {
        Caller {
            authenticated: true,
            user_id: Some("user-admin".to_string()),
            staff: true,
            vendor: None,
        }
    }

    fn vendor() -> Caller {
        Caller {
            authenticated: true,
            user_id: Some("user-vendor".to_string()),
            staff: false,
            vendor: Some(VendorIdentity {
                id: "vendor-1".to_string(),
                category_id: Some("cat-1".to_string()),
            }),
        }
    }

    fn plain_user() -> Caller {
        Caller {
            authenticated: true,
            user_id: Some("user-plain".to_string()),
            staff: false,
            vendor: None,
        }
    }

    #[test]
    fn test_anonymous_fails_with_authentication_required() {
        for caps in [ADMIN_ONLY, VENDOR_ONLY, ADMIN_OR_VENDOR] {
            assert!(matches!(
                authorize(&Caller::anonymous(), caps),
                Err(ApiError::AuthenticationRequired)
            ));
        }
    }

    #[test]
    fn test_admin_capability_matrix() {
        assert!(authorize(&admin(), ADMIN_ONLY).is_ok());
        assert!(authorize(&admin(), ADMIN_OR_VENDOR).is_ok());
        assert!(matches!(
            authorize(&admin(), VENDOR_ONLY),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_vendor_capability_matrix() {
        assert!(authorize(&vendor(), VENDOR_ONLY).is_ok());
        assert!(authorize(&vendor(), ADMIN_OR_VENDOR).is_ok());
        assert!(matches!(
            authorize(&vendor(), ADMIN_ONLY),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn test_authenticated_non_role_user_is_forbidden() {
        assert!(matches!(
            authorize(&plain_user(), ADMIN_OR_VENDOR),
            Err(ApiError::Forbidden)
        ));
    }
}
