use async_trait::async_trait;
use chrono::Utc;

use activities_common::ActivityId;

use crate::error::{RestError, Result};
use crate::mediator::{Handler, Mediator, Request};
use crate::records::UserActivity;

pub struct Command {
    pub id: ActivityId,
    pub username: String,
}

impl Request for Command {
    type Response = ();
}

#[async_trait]
impl Handler<Command> for Mediator {
    async fn handle(&self, request: Command) -> Result<()> {
        self.context().activity_mut(&request.id, |record| {
            if record.is_attending(&request.username) {
                return Err(RestError::bad_request("attendance", "Already attending activity").into());
            }
            record.attendees.push(UserActivity {
                username: request.username.clone(),
                is_host: false,
                date_joined: Utc::now(),
            });
            Ok(())
        })?;
        tracing::info!(id = %request.id, username = %request.username, "attendee added");
        Ok(())
    }
}
