use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{LoginRequest, LoginResponse, Pagination, RegisterRequest, User},
    state::AppState,
};

/// Registers a user, generating their bio before the record is stored.
///
/// Uniqueness is checked up front so no model call is spent on a doomed
/// registration; the store's own constraint still guards concurrent ones.
pub async fn register(state: &AppState, request: RegisterRequest) -> AppResult<User> {
    if state.store.find_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }
    if state
        .store
        .find_user_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let mut user = User::new(request);
    user.ai_generated_bio = Some(state.enricher.generate_bio(&user).await);

    state.store.insert_user(&user).await?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        profile_type = %user.profile_type,
        "User registered"
    );

    Ok(user)
}

/// Email lookup only. No credential is verified.
pub async fn login(state: &AppState, request: LoginRequest) -> AppResult<LoginResponse> {
    let user = state
        .store
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    Ok(LoginResponse {
        user_id: user.id,
        message: "Login successful".to_string(),
    })
}

pub async fn get_user(state: &AppState, user_id: Uuid) -> AppResult<User> {
    state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn list_users(state: &AppState, page: Pagination) -> AppResult<Vec<User>> {
    state.store.list_users(page).await
}
