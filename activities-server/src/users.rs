use async_trait::async_trait;

use activities_common::{NewUser, User};

use crate::error::{RestError, Result};
use crate::mediator::{Handler, Mediator, Request};
use crate::records::AppUser;

/// Creates the user or refreshes its profile.
pub struct Register {
    pub user: NewUser,
}

impl Request for Register {
    type Response = User;
}

#[async_trait]
impl Handler<Register> for Mediator {
    async fn handle(&self, request: Register) -> Result<User> {
        let NewUser { username, display_name, image } = request.user;
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(RestError::bad_request("username", "'username' must not be empty.").into());
        }
        let display_name = match display_name.trim() {
            "" => username.clone(),
            name => name.to_string(),
        };
        let user = AppUser { username, display_name, image };
        self.context().upsert_user(&user)?;
        tracing::info!(username = %user.username, "user registered");
        Ok(user.into())
    }
}

pub struct Detail {
    pub username: String,
}

impl Request for Detail {
    type Response = User;
}

#[async_trait]
impl Handler<Detail> for Mediator {
    async fn handle(&self, request: Detail) -> Result<User> {
        Ok(self.context().user(&request.username)?.into())
    }
}
