use async_trait::async_trait;

use activities_common::{Activity, ActivityId};

use crate::activities::validate;
use crate::error::Result;
use crate::mediator::{Handler, Mediator, Request};

pub struct Command {
    pub id: ActivityId,
    pub activity: Activity,
}

impl Request for Command {
    type Response = ();
}

#[async_trait]
impl Handler<Command> for Mediator {
    async fn handle(&self, request: Command) -> Result<()> {
        validate(&request.activity)?;
        self.context().activity_mut(&request.id, |record| {
            record.apply(&request.activity);
            Ok(())
        })?;
        tracing::info!(id = %request.id, "activity edited");
        Ok(())
    }
}
