use async_trait::async_trait;

use activities_common::ActivityId;

use crate::error::{RestError, Result};
use crate::mediator::{Handler, Mediator, Request};

pub struct Command {
    pub id: ActivityId,
}

impl Request for Command {
    type Response = ();
}

#[async_trait]
impl Handler<Command> for Mediator {
    async fn handle(&self, request: Command) -> Result<()> {
        if !self.context().remove_activity(&request.id)? {
            return Err(RestError::NotFound("activity").into());
        }
        tracing::info!(id = %request.id, "activity deleted");
        Ok(())
    }
}
