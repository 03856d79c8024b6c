pub mod attend;
pub mod create;
pub mod delete;
pub mod detail;
pub mod edit;
pub mod list;
pub mod unattend;

use serde_json::{Map, Value};

use activities_common::Activity;

use crate::error::RestError;

/// Required-field checks shared by create and edit.
pub fn validate(activity: &Activity) -> Result<(), RestError> {
    let mut errors = Map::new();
    let fields = [
        ("title", &activity.title),
        ("description", &activity.description),
        ("category", &activity.category),
        ("city", &activity.city),
        ("venue", &activity.venue),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            errors.insert(name.to_string(), Value::from(format!("'{name}' must not be empty.")));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RestError::BadRequest(Value::Object(errors)))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use activities_common::{Activity, ActivityId};

    use crate::mediator::Mediator;
    use crate::persistence::DataContext;
    use crate::records::AppUser;

    pub fn mediator() -> Mediator {
        let ctx = DataContext::temporary().unwrap();
        for (username, display_name) in [("bob", "Bob"), ("tom", "Tom"), ("jane", "Jane")] {
            ctx.upsert_user(&AppUser {
                username: username.into(),
                display_name: display_name.into(),
                image: None,
            })
            .unwrap();
        }
        Mediator::new(ctx)
    }

    pub fn activity(id: &str) -> Activity {
        Activity {
            id: ActivityId::from(id),
            title: "Past activity".into(),
            description: "Activity 2 months ago".into(),
            category: "drinks".into(),
            date: Utc.with_ymd_and_hms(2024, 1, 2, 19, 30, 0).unwrap(),
            city: "London".into(),
            venue: "Pub".into(),
            attendees: vec![],
            is_host: false,
            is_going: false,
        }
    }
}
