use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::auth::{LoginRequest, LoginSession, RegisterRequest},
    error::{AppError, AppResult, is_unique_violation},
    models::User,
    state::AppState,
};

pub const DUPLICATE_USER: &str = "Username or email already exists!";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn validate_registration(payload: &RegisterRequest) -> AppResult<()> {
    if payload.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }
    Ok(())
}

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<User> {
    validate_registration(&payload)?;
    let RegisterRequest {
        username,
        email,
        password,
    } = payload;

    let password_hash = hash_password(&password)?;

    // Uniqueness of username and email is enforced by the table constraints.
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username.trim())
    .bind(email.trim())
    .bind(password_hash)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict(DUPLICATE_USER.into())
        } else {
            err.into()
        }
    })?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    audit::record(
        &state.pool,
        Some(user.id),
        AuditAction::UserRegister,
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(user)
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginSession> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.trim())
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::InvalidCredentials),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.sessions.issue(&user)?;

    audit::record(
        &state.pool,
        Some(user.id),
        AuditAction::UserLogin,
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(LoginSession { user, token })
}
