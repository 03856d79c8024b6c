use async_trait::async_trait;

use activities_common::{Activity, ActivityId};

use crate::error::Result;
use crate::mediator::{Handler, Mediator, Request};
use crate::records::to_activity;

pub struct Query {
    pub id: ActivityId,
    pub username: String,
}

impl Request for Query {
    type Response = Activity;
}

#[async_trait]
impl Handler<Query> for Mediator {
    async fn handle(&self, request: Query) -> Result<Activity> {
        let ctx = self.context();
        let record = ctx.activity(&request.id)?;
        Ok(to_activity(&record, &request.username, |name| ctx.lookup_user(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::{create, fixtures};
    use crate::error::RestError;

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let mediator = fixtures::mediator();
        let err = mediator
            .send(Query { id: ActivityId::from("missing"), username: "bob".into() })
            .await
            .unwrap_err();
        assert!(matches!(err.rest(), Some(RestError::NotFound("activity"))));
    }

    #[tokio::test]
    async fn detail_maps_host_profile() {
        let mediator = fixtures::mediator();
        mediator
            .send(create::Command { activity: fixtures::activity("1"), username: "bob".into() })
            .await
            .unwrap();

        let activity = mediator
            .send(Query { id: ActivityId::from("1"), username: "tom".into() })
            .await
            .unwrap();
        assert_eq!(activity.host().map(|h| h.display_name.as_str()), Some("Bob"));
        assert!(!activity.is_going);
    }
}
