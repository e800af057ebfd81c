use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, Credentials, PublicUser, RefreshRequest},
        jwt::{AuthUser, BAD_TOKEN},
        password,
        repo::{User, USER_EXISTS},
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
};

const BAD_CREDENTIALS: &str = "Invalid credentials";
const NO_USER: &str = "User not found";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = state.jwt.sign_access(user.id)?;
    let refresh_token = state.jwt.sign_refresh(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.normalize();
    payload.validate_new().map_err(AppError::Validation)?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict(USER_EXISTS));
    }

    let hash = password::hash(&payload.password)?;
    let user = state.users.create(&payload.email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.normalize();
    payload.validate_login().map_err(AppError::Validation)?;

    let Some(user) = state.users.find_by_email(&payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    };

    if !password::matches(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let claims = state.jwt.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized(BAD_TOKEN)
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or(AppError::Unauthorized(NO_USER))?;

    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthorized(NO_USER))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
    }))
}
