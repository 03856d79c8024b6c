use async_trait::async_trait;

use activities_common::Activity;

use crate::error::Result;
use crate::mediator::{Handler, Mediator, Request};
use crate::records::to_activity;

pub struct Query {
    pub username: String,
}

impl Request for Query {
    type Response = Vec<Activity>;
}

#[async_trait]
impl Handler<Query> for Mediator {
    async fn handle(&self, request: Query) -> Result<Vec<Activity>> {
        let ctx = self.context();
        let mut activities: Vec<Activity> = ctx
            .activities()?
            .iter()
            .map(|record| to_activity(record, &request.username, |name| ctx.lookup_user(name)))
            .collect();
        activities.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::activities::{create, fixtures};

    #[tokio::test]
    async fn lists_in_date_order_with_user_flags() {
        let mediator = fixtures::mediator();
        let later = fixtures::activity("later");
        let mut earlier = fixtures::activity("earlier");
        earlier.date = later.date - Duration::days(3);

        mediator.send(create::Command { activity: later, username: "bob".into() }).await.unwrap();
        mediator.send(create::Command { activity: earlier, username: "tom".into() }).await.unwrap();

        let activities = mediator.send(Query { username: "bob".into() }).await.unwrap();
        let ids: Vec<_> = activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["earlier", "later"]);
        assert!(!activities[0].is_going);
        assert!(activities[1].is_host);
    }
}
