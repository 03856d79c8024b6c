use async_trait::async_trait;

use activities_common::ActivityId;

use crate::error::{RestError, Result};
use crate::mediator::{Handler, Mediator, Request};

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
            if record.is_host(&request.username) {
                return Err(
                    RestError::bad_request("attendance", "You cannot remove yourself as host").into(),
                );
            }
            record.attendees.retain(|a| a.username != request.username);
            Ok(())
        })?;
        tracing::info!(id = %request.id, username = %request.username, "attendee removed");
        Ok(())
    }
}
