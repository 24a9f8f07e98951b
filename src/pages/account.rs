use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::PageResult,
    middleware::auth::CurrentUser,
    services::auth_service,
    session,
    state::AppState,
    views,
};

pub async fn register_page(CurrentUser(user): CurrentUser) -> Html<String> {
    Html(views::register_form(user.as_ref()))
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterRequest>,
) -> PageResult<Redirect> {
    auth_service::register_user(&state, form).await?;
    Ok(Redirect::to("/login"))
}

pub async fn login_page(CurrentUser(user): CurrentUser) -> Html<String> {
    Html(views::login_form(user.as_ref()))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginRequest>,
) -> PageResult<impl IntoResponse> {
    let login = auth_service::login_user(&state, form).await?;
    tracing::info!(user_id = %login.user.id, "user signed in");
    let jar = jar.add(state.sessions.cookie(login.token));
    Ok((jar, Redirect::to("/")))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(session::removal_cookie()), Redirect::to("/login"))
}
