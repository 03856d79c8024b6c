use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use activities_common::{Activity, ActivityId, Attendee, User};

/// Stored form of an activity; attendees reference users by name only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub city: String,
    pub venue: String,
    pub attendees: Vec<UserActivity>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserActivity {
    pub username: String,
    pub is_host: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppUser {
    pub username: String,
    pub display_name: String,
    pub image: Option<String>,
}

impl ActivityRecord {
    pub fn is_attending(&self, username: &str) -> bool {
        self.attendees.iter().any(|a| a.username == username)
    }

    pub fn is_host(&self, username: &str) -> bool {
        self.attendees.iter().any(|a| a.username == username && a.is_host)
    }

    /// Copies the editable scalar fields, leaving id and attendees alone.
    pub fn apply(&mut self, activity: &Activity) {
        self.title = activity.title.clone();
        self.description = activity.description.clone();
        self.category = activity.category.clone();
        self.date = activity.date;
        self.city = activity.city.clone();
        self.venue = activity.venue.clone();
    }
}

impl From<AppUser> for User {
    fn from(user: AppUser) -> Self {
        User {
            username: user.username,
            display_name: user.display_name,
            image: user.image,
        }
    }
}

/// Maps stored records to wire DTOs. `lookup` resolves a username to its
/// profile; attendees whose user has vanished keep their username as display name.
pub fn to_attendee(user_activity: &UserActivity, lookup: impl Fn(&str) -> Option<AppUser>) -> Attendee {
    match lookup(&user_activity.username) {
        Some(user) => Attendee {
            username: user.username,
            display_name: user.display_name,
            image: user.image,
            is_host: user_activity.is_host,
        },
        None => Attendee {
            username: user_activity.username.clone(),
            display_name: user_activity.username.clone(),
            image: None,
            is_host: user_activity.is_host,
        },
    }
}

pub fn to_activity(
    record: &ActivityRecord,
    acting_user: &str,
    lookup: impl Fn(&str) -> Option<AppUser>,
) -> Activity {
    let attendees: Vec<Attendee> = record
        .attendees
        .iter()
        .map(|ua| to_attendee(ua, &lookup))
        .collect();
    Activity {
        id: record.id.clone(),
        title: record.title.clone(),
        description: record.description.clone(),
        category: record.category.clone(),
        date: record.date,
        city: record.city.clone(),
        venue: record.venue.clone(),
        is_going: record.is_attending(acting_user),
        is_host: record.is_host(acting_user),
        attendees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ActivityRecord {
        let joined = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ActivityRecord {
            id: ActivityId::from("a1"),
            title: "Climb".into(),
            description: "Bouldering".into(),
            category: "sport".into(),
            date: Utc.with_ymd_and_hms(2024, 2, 1, 18, 0, 0).unwrap(),
            city: "Leeds".into(),
            venue: "The Depot".into(),
            attendees: vec![
                UserActivity { username: "bob".into(), is_host: true, date_joined: joined },
                UserActivity { username: "ghost".into(), is_host: false, date_joined: joined },
            ],
        }
    }

    fn lookup(name: &str) -> Option<AppUser> {
        (name == "bob").then(|| AppUser {
            username: "bob".into(),
            display_name: "Bob".into(),
            image: Some("bob.png".into()),
        })
    }

    #[test]
    fn maps_attendees_through_user_profiles() {
        let activity = to_activity(&record(), "bob", lookup);
        assert_eq!(activity.attendees[0].display_name, "Bob");
        assert_eq!(activity.attendees[0].image.as_deref(), Some("bob.png"));
        assert!(activity.attendees[0].is_host);
        assert_eq!(activity.attendees[1].display_name, "ghost");
        assert!(activity.is_host);
        assert!(activity.is_going);
    }

    #[test]
    fn flags_are_relative_to_acting_user() {
        let activity = to_activity(&record(), "ghost", lookup);
        assert!(activity.is_going);
        assert!(!activity.is_host);
        let activity = to_activity(&record(), "stranger", lookup);
        assert!(!activity.is_going);
    }
}
