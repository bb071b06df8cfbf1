//! Axum route handlers for the Validation API.

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::validation::media::{check_profile_picture, ProfilePicture, ProfilePictureCheck};
use crate::validation::phone::{format_indian_phone, is_valid_indian_phone};
use crate::validation::schemas::schema_by_name;
use crate::validation::{validate, FormValues, ValidationResult};

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub form: &'static str,
    pub valid: bool,
    pub errors: ValidationResult,
}

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PhoneFormatResponse {
    pub formatted: String,
    pub valid_indian_mobile: bool,
}

/// POST /api/v1/validate/:form
///
/// Field errors are part of a 200 response; the form renders them inline.
pub async fn handle_validate(
    Path(form): Path<String>,
    Json(values): Json<FormValues>,
) -> Result<Json<ValidateResponse>, AppError> {
    let schema =
        schema_by_name(&form).ok_or_else(|| AppError::NotFound(format!("Unknown form '{form}'")))?;

    let errors = validate(schema, &values);
    Ok(Json(ValidateResponse {
        form: schema.name,
        valid: errors.is_valid(),
        errors,
    }))
}

/// POST /api/v1/validate/profile-picture
pub async fn handle_validate_profile_picture(
    Json(picture): Json<ProfilePicture>,
) -> Json<ProfilePictureCheck> {
    Json(check_profile_picture(&picture))
}

/// GET /api/v1/phone/format?phone=...
pub async fn handle_format_phone(Query(query): Query<PhoneQuery>) -> Json<PhoneFormatResponse> {
    let phone = query.phone.as_deref();
    Json(PhoneFormatResponse {
        formatted: format_indian_phone(phone),
        valid_indian_mobile: phone.is_some_and(is_valid_indian_phone),
    })
}
