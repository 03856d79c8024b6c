use async_trait::async_trait;
use chrono::Utc;

use activities_common::Activity;

use crate::activities::validate;
use crate::error::{RestError, Result};
use crate::mediator::{Handler, Mediator, Request};
use crate::records::{ActivityRecord, UserActivity};

pub struct Command {
    pub activity: Activity,
    pub username: String,
}

impl Request for Command {
    type Response = ();
}

#[async_trait]
impl Handler<Command> for Mediator {
    async fn handle(&self, request: Command) -> Result<()> {
        let Command { activity, username } = request;
        validate(&activity)?;
        if activity.id.as_str().trim().is_empty() {
            return Err(RestError::bad_request("id", "'id' must not be empty.").into());
        }
        // The creator is always the single host; any attendees sent by the client are ignored.
        let record = ActivityRecord {
            id: activity.id.clone(),
            title: activity.title,
            description: activity.description,
            category: activity.category,
            date: activity.date,
            city: activity.city,
            venue: activity.venue,
            attendees: vec![UserActivity {
                username: username.clone(),
                is_host: true,
                date_joined: Utc::now(),
            }],
        };
        if !self.context().insert_new_activity(&record)? {
            return Err(RestError::bad_request("id", "Activity already exists").into());
        }
        tracing::info!(id = %record.id, host = %username, "activity created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Barrier;

    use super::*;
    use crate::activities::fixtures;

    #[tokio::test]
    async fn creator_becomes_only_host() {
        let mediator = fixtures::mediator();
        let mut activity = fixtures::activity("1");
        activity.attendees.push(activities_common::Attendee {
            username: "tom".into(),
            display_name: "Tom".into(),
            image: None,
            is_host: true,
        });
        mediator.send(Command { activity, username: "bob".into() }).await.unwrap();

        let record = mediator.context().activity(&"1".into()).unwrap();
        assert_eq!(record.attendees.len(), 1);
        assert!(record.is_host("bob"));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let mediator = fixtures::mediator();
        mediator
            .send(Command { activity: fixtures::activity("1"), username: "bob".into() })
            .await
            .unwrap();
        let err = mediator
            .send(Command { activity: fixtures::activity("1"), username: "tom".into() })
            .await
            .unwrap_err();
        assert!(matches!(err.rest(), Some(RestError::BadRequest(_))));
        assert!(mediator.context().activity(&"1".into()).unwrap().is_host("bob"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_creates_with_same_id_admit_one_host() {
        for round in 0..50 {
            let mediator = fixtures::mediator();
            let id = format!("race-{round}");
            let barrier = Arc::new(Barrier::new(2));
            let tasks: Vec<_> = ["bob", "tom"]
                .into_iter()
                .map(|username| {
                    let mediator = mediator.clone();
                    let barrier = barrier.clone();
                    let activity = fixtures::activity(&id);
                    tokio::spawn(async move {
                        barrier.wait().await;
                        mediator.send(Command { activity, username: username.into() }).await.is_ok()
                    })
                })
                .collect();

            let mut created = 0;
            for task in tasks {
                if task.await.unwrap() {
                    created += 1;
                }
            }
            assert_eq!(created, 1, "round {round}");
            let record = mediator.context().activity(&id.as_str().into()).unwrap();
            assert_eq!(record.attendees.len(), 1);
        }
    }

    #[tokio::test]
    async fn invalid_activity_is_not_stored() {
        let mediator = fixtures::mediator();
        let mut activity = fixtures::activity("1");
        activity.title.clear();
        assert!(mediator.send(Command { activity, username: "bob".into() }).await.is_err());
        assert!(mediator.context().find_activity(&"1".into()).unwrap().is_none());
    }
}
