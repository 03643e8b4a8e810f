use account_application::{RegisterUseCase, Registration, VerificationPolicy};
use account_core::{
    AccountStore, Email, EmailClient, Gender, Password, PersonName, PhoneNumber, Profile,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::http::response::ApiResponse;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub address: Option<String>,
    pub phone_number: String,
    pub email: Secret<String>,
    pub password: Secret<String>,
    pub confirm_password: Secret<String>,
}

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<S, E>(
    State((account_store, email_client, verification_policy)): State<(
        S,
        E,
        VerificationPolicy,
    )>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: AccountStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    if request.password.expose_secret() != request.confirm_password.expose_secret() {
        return Err(ApiError::InvalidInput(
            "Password and confirm password does not match".to_string(),
        ));
    }

    let profile = Profile {
        first_name: Some(PersonName::parse(&request.first_name)?),
        last_name: Some(PersonName::parse(&request.last_name)?),
        gender: Some(
            request
                .gender
                .parse::<Gender>()
                .map_err(ApiError::InvalidInput)?,
        ),
        date_of_birth: Some(request.date_of_birth),
        address: request.address,
        phone_number: Some(PhoneNumber::parse(&request.phone_number)?),
        picture: None,
    };

    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let use_case = RegisterUseCase::new(account_store, email_client, verification_policy);

    use_case
        .execute(Registration {
            email,
            profile,
            password,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::verification_pending(
            "Account has been created successfully, please verify your Email",
        )),
    ))
}
