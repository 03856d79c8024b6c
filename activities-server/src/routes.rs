use anyhow::Context;
use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use activities_common::{Activity, ActivityId, NewUser, User, USERNAME_HEADER};

use crate::activities::{attend, create, delete, detail, edit, list, unattend};
use crate::error::{AppError, RestError, Result};
use crate::mediator::Mediator;
use crate::users;

pub fn app(mediator: Mediator) -> Router {
    axum::Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route(
            "/api/activities/:id",
            get(activity_detail).put(edit_activity).delete(delete_activity),
        )
        .route("/api/activities/:id/attend", post(attend_activity).delete(unattend_activity))
        .route("/api/users", post(register_user))
        .route("/api/users/:username", get(user_detail))
        .layer(Extension(mediator))
}

/// The registered user named by the `x-username` header.
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let mediator = parts
            .extensions
            .get::<Mediator>()
            .context("mediator extension missing")?;
        let username = parts
            .headers
            .get(USERNAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(RestError::Unauthorized)?;
        match mediator.context().find_user(username)? {
            Some(user) => Ok(CurrentUser(user.username)),
            None => Err(RestError::Unauthorized.into()),
        }
    }
}

async fn list_activities(Extension(mediator): Extension<Mediator>, CurrentUser(username): CurrentUser) -> Result<Json<Vec<Activity>>> {
    Ok(Json(mediator.send(list::Query { username }).await?))
}

async fn activity_detail(
    Extension(mediator): Extension<Mediator>,
    CurrentUser(username): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    Ok(Json(mediator.send(detail::Query { id: ActivityId(id), username }).await?))
}

async fn create_activity(
    Extension(mediator): Extension<Mediator>,
    CurrentUser(username): CurrentUser,
    Json(activity): Json<Activity>,
) -> Result<()> {
    mediator.send(create::Command { activity, username }).await
}

async fn edit_activity(
    Extension(mediator): Extension<Mediator>,
    CurrentUser(_username): CurrentUser,
    Path(id): Path<String>,
    Json(activity): Json<Activity>,
) -> Result<()> {
    mediator.send(edit::Command { id: ActivityId(id), activity }).await
}

async fn delete_activity(
    Extension(mediator): Extension<Mediator>,
    CurrentUser(_username): CurrentUser,
    Path(id): Path<String>,
) -> Result<()> {
    mediator.send(delete::Command { id: ActivityId(id) }).await
}

async fn attend_activity(
    Extension(mediator): Extension<Mediator>,
    CurrentUser(username): CurrentUser,
    Path(id): Path<String>,
) -> Result<()> {
    mediator.send(attend::Command { id: ActivityId(id), username }).await
}

async fn unattend_activity(
    Extension(mediator): Extension<Mediator>,
    CurrentUser(username): CurrentUser,
    Path(id): Path<String>,
) -> Result<()> {
    mediator.send(unattend::Command { id: ActivityId(id), username }).await
}

async fn register_user(Extension(mediator): Extension<Mediator>, Json(user): Json<NewUser>) -> Result<Json<User>> {
    Ok(Json(mediator.send(users::Register { user }).await?))
}

async fn user_detail(Extension(mediator): Extension<Mediator>, Path(username): Path<String>) -> Result<Json<User>> {
    Ok(Json(mediator.send(users::Detail { username }).await?))
}
