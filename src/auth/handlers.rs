use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SignupRequest},
        extractors::CurrentUser,
        services::{create_user, verify_credentials},
        session::Session,
    },
    error::{json_body, ApiError, ApiResult, ValidationError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", delete(logout))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/check_session", get(check_session))
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

#[instrument(skip(state, session, payload))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, CookieJar, Json<PublicUser>)> {
    let payload = json_body(payload, ValidationError::MissingCredentials.into())?;
    let (Some(username), Some(password)) = (present(payload.username), present(payload.password))
    else {
        warn!("signup without username or password");
        return Err(ValidationError::MissingCredentials.into());
    };

    let user = create_user(
        state.users.as_ref(),
        &username,
        &password,
        payload.image_url,
        payload.bio,
    )
    .await?;

    let jar = session.establish(user.id)?;
    info!(user_id = user.id, username = %user.username, "user signed up");
    Ok((StatusCode::CREATED, jar, Json(PublicUser::from(user))))
}

#[instrument(skip(current))]
pub async fn check_session(CurrentUser(current): CurrentUser) -> Json<PublicUser> {
    Json(PublicUser::from(current))
}

#[instrument(skip(state, session, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<PublicUser>)> {
    let payload = json_body(payload, ApiError::Unauthorized)?;
    let user = match verify_credentials(state.users.as_ref(), &payload.username, &payload.password)
        .await
    {
        Ok(u) => u,
        Err(e @ (ApiError::NotFound | ApiError::BadPassword)) => {
            warn!(username = %payload.username, reason = %e, "login rejected");
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let jar = session.establish(user.id)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((jar, Json(PublicUser::from(user))))
}

/// Always succeeds. Answers 204 even when nobody was logged in.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> (StatusCode, CookieJar) {
    if let Some(user_id) = session.current_user_id() {
        info!(user_id, "user logged out");
    }
    (StatusCode::NO_CONTENT, session.clear())
}
