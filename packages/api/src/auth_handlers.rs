// ABOUTME: HTTP request handlers for registration and authentication
// ABOUTME: Vendor/admin registration, login, and the password reset flow

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use procura_auth::{decode_uid, encode_uid, hash_password, verify_password};
use procura_core::validation::MIN_PASSWORD_LENGTH;
use procura_core::{
    validate_admin_registration, validate_vendor_registration, PublicUser, UserCreateInput,
    ValidationError, VendorRegistrationInput,
};
use procura_notify::MailDraft;
use procura_storage::StorageError;

use crate::auth::{authorize, Caller, ADMIN_ONLY};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::ApiState;

/// Every reset-link failure collapses into this one message so callers
/// cannot distinguish bad encodings from unknown users or expired tokens.
const INVALID_RESET_LINK: &str = "Invalid or expired reset link";

/// Both forgot-password outcomes return this exact body so the endpoint
/// does not leak which emails are registered.
const FORGOT_PASSWORD_MESSAGE: &str = "If this email is registered, a reset link has been sent.";

/// Register a vendor: creates the user account and its vendor profile, and
/// queues the welcome email, all in one transaction.
pub async fn register_vendor(
    State(state): State<ApiState>,
    Json(request): Json<VendorRegistrationInput>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Registering vendor (username: {})", request.username);

    let errors = validate_vendor_registration(&request);
    if !errors.is_empty() {
        return Err(ApiError::from_validation(errors));
    }

    let password_hash = hash_password(&request.password)?;
    let welcome = welcome_mail(&request.email, &request.first_name, &state.frontend_url);

    let (user, vendor) = state
        .db
        .register_vendor(&request, &password_hash, &welcome)
        .await?;

    let body = json!({
        "user": PublicUser::from(user),
        "vendor_id": vendor.id,
        "message": "Vendor registered successfully. Awaiting approval.",
    });

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(body)),
    ))
}

/// Request body for admin registration
#[derive(Deserialize)]
pub struct AdminRegistrationRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
}

/// Create a staff user. Only existing admins may call this; the first admin
/// is seeded out-of-band.
pub async fn register_admin(
    State(state): State<ApiState>,
    caller: Caller,
    Json(request): Json<AdminRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&caller, ADMIN_ONLY)?;

    info!("Registering admin (username: {})", request.username);

    let errors = validate_admin_registration(&request.username, &request.email, &request.password);
    if !errors.is_empty() {
        return Err(ApiError::from_validation(errors));
    }

    let user = state
        .db
        .user_storage
        .create_user(UserCreateInput {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash: hash_password(&request.password)?,
            is_staff: true,
        })
        .await?;

    let body = json!({
        "user": PublicUser::from(user),
        "message": "Admin created.",
    });

    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(body)),
    ))
}

/// Request body for login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Exchange username/password for a session token. The response carries the
/// caller's public profile and, for vendors, the vendor profile.
pub async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt (username: {})", request.username);

    let user = state
        .db
        .user_storage
        .get_by_username(&request.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let vendor = state.db.vendor_storage.get_by_user_id(&user.id).await?;

    let access = state
        .signer
        .issue(&user.id, user.is_staff, vendor.as_ref().map(|v| v.id.as_str()))?;

    let vendor_detail = match &vendor {
        Some(v) => Some(state.db.vendor_storage.get_vendor_detail(&v.id).await?),
        None => None,
    };

    let mut body = json!({
        "access": access,
        "user": PublicUser::from(user),
    });
    if let Some(detail) = vendor_detail {
        body["vendor"] = serde_json::to_value(detail)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }

    Ok(ResponseJson(ApiResponse::success(body)))
}

/// Request body for forgot-password
#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Issue a reset token and queue the reset email. An unknown email returns
/// the identical response with no email queued.
pub async fn forgot_password(
    State(state): State<ApiState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    info!("Password reset requested");

    if let Some(user) = state.db.user_storage.get_by_email(&request.email).await? {
        let token = state
            .db
            .reset_tokens
            .issue(&user.id, state.reset_ttl_secs)
            .await?;
        let reset_url = format!(
            "{}/reset-password/{}/{}/",
            state.frontend_url,
            encode_uid(&user.id),
            token
        );

        state
            .db
            .outbox
            .enqueue(&reset_mail(&user.email, &user.first_name, &reset_url))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }

    Ok(ResponseJson(ApiResponse::success(json!({
        "message": FORGOT_PASSWORD_MESSAGE,
    }))))
}

/// Request body for reset-password
#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

/// Consume a reset token and overwrite the user's password. Every
/// verification failure returns the same generic error.
pub async fn reset_password(
    State(state): State<ApiState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.uid.is_empty() || request.token.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::from_validation(vec![ValidationError::new(
            "password",
            format!(
                "Ensure this field has at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
        )]));
    }

    let user_id = decode_uid(&request.uid)
        .map_err(|_| ApiError::BadRequest(INVALID_RESET_LINK.to_string()))?;

    let user = match state.db.user_storage.get_user(&user_id).await {
        Ok(user) => user,
        Err(StorageError::NotFound) => {
            return Err(ApiError::BadRequest(INVALID_RESET_LINK.to_string()))
        }
        Err(other) => return Err(other.into()),
    };

    let valid = state
        .db
        .reset_tokens
        .verify_and_consume(&user.id, &request.token)
        .await?;
    if !valid {
        return Err(ApiError::BadRequest(INVALID_RESET_LINK.to_string()));
    }

    info!("Resetting password for user: {}", user.id);

    let password_hash = hash_password(&request.password)?;
    state
        .db
        .user_storage
        .update_password(&user.id, &password_hash)
        .await?;

    Ok(ResponseJson(ApiResponse::success(json!({
        "message": "Password has been reset successfully!",
    }))))
}

fn welcome_mail(email: &str, first_name: &str, frontend_url: &str) -> MailDraft {
    let login_url = format!("{}/", frontend_url);
    MailDraft {
        recipient: email.to_string(),
        subject: "Registration Successful - RFP Management".to_string(),
        body_text: format!(
            "Hello {},\nYour RFP account was created successfully.",
            first_name
        ),
        body_html: Some(format!(
            "<p>Hello {},</p><p>Your RFP account was created successfully.</p>\
             <p><a href=\"{}\">Log in</a> once your profile has been approved.</p>",
            first_name, login_url
        )),
    }
}

fn reset_mail(email: &str, first_name: &str, reset_url: &str) -> MailDraft {
    MailDraft {
        recipient: email.to_string(),
        subject: "Reset Your Password - RFP Management".to_string(),
        body_text: format!("Click the link to reset your password: {}", reset_url),
        body_html: Some(format!(
            "<p>Hello {},</p><p><a href=\"{}\">Reset your password</a>. \
             The link expires in one hour and can be used once.</p>",
            first_name, reset_url
        )),
    }
}
