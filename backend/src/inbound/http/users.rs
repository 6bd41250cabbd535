//! Account endpoints.
//!
//! ```text
//! POST   /users                    {"userId":"giran_fan","name":"Kita","password":"..."}
//! GET    /users/{userId}
//! PUT    /users/{userId}           {"name":"...","favoritePlayer":"...","bio":"..."}
//! PUT    /users/{userId}/password  {"currentPassword":"...","newPassword":"..."}
//! DELETE /users/{userId}
//! POST   /auth/login               {"userId":"giran_fan","password":"..."}
//! GET    /auth/me
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, LoginOutcome, Password, ProfileUpdate, Registration, UserId,
    UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "giran_fan")]
    pub user_id: String,
    #[schema(example = "Kita Taro")]
    pub name: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.user_id, &value.name, &value.password)
    }
}

/// Body for `POST /auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.user_id, &value.password)
    }
}

/// Body for `PUT /users/{userId}`. Absent fields are left unchanged; an empty
/// `favoritePlayer` or `bio` clears it.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub favorite_player: Option<String>,
    pub bio: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.name.as_deref(),
            value.favorite_player.as_deref(),
            value.bio.as_deref(),
        )
    }
}

/// Body for `PUT /users/{userId}/password`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Register an account.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "userId already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let registration = Registration::try_from(payload.into_inner())?;
    let profile = state.accounts.register(registration).await?;
    Ok(web::Json(profile))
}

/// Fetch a supporter's profile.
#[utoipa::path(
    get,
    path = "/users/{userId}",
    params(("userId" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    let user_id = UserId::new(path.into_inner())?;
    Ok(web::Json(state.accounts.profile(&user_id).await?))
}

/// Update a profile. Callers may edit themselves; admins may edit anyone.
#[utoipa::path(
    put,
    path = "/users/{userId}",
    params(("userId" = String, Path, description = "Account identifier")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let user_id = UserId::new(path.into_inner())?;
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let profile = state
        .accounts
        .update_profile(&caller, &user_id, update)
        .await?;
    Ok(web::Json(profile))
}

/// Change the caller's own password.
#[utoipa::path(
    put,
    path = "/users/{userId}/password",
    params(("userId" = String, Path, description = "Account identifier")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Current password is wrong", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[put("/users/{user_id}/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(path.into_inner())?;
    let ChangePasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    let current = Password::unchecked(&current_password);
    let new = Password::new("newPassword", &new_password)?;
    state
        .accounts
        .change_password(&caller, &user_id, &current, &new)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Soft-delete an account.
#[utoipa::path(
    delete,
    path = "/users/{userId}",
    params(("userId" = String, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(path.into_inner())?;
    state.accounts.delete(&caller, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginOutcome),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account suspended", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginOutcome>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    Ok(web::Json(state.accounts.login(&credentials).await?))
}

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Account suspended", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(caller: AuthenticatedUser) -> web::Json<UserProfile> {
    web::Json(caller.profile())
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
