pub mod grouping;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use grouping::{group_by_date, DateGroup};

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ActivityId(pub String);

impl ActivityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A participation record of one user in an activity.
#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub username: String,
    pub display_name: String,
    pub image: Option<String>,
    pub is_host: bool,
}

impl Attendee {
    /// Builds the attendee record the given user would have when joining.
    pub fn for_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            image: user.image.clone(),
            is_host: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
    pub city: String,
    pub venue: String,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub is_host: bool,
    #[serde(default)]
    pub is_going: bool,
}

impl Activity {
    /// Recomputes `is_going` and `is_host` relative to `user`.
    pub fn decorate_for(&mut self, user: &User) {
        let own = self.attendees.iter().find(|a| a.username == user.username);
        self.is_going = own.is_some();
        self.is_host = own.map(|a| a.is_host).unwrap_or(false);
    }

    pub fn host(&self) -> Option<&Attendee> {
        self.attendees.iter().find(|a| a.is_host)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub display_name: String,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Header carrying the acting user's name on every API request.
pub const USERNAME_HEADER: &str = "x-username";

pub mod routes {
    use crate::ActivityId;

    pub const DASHBOARD: &str = "/activities";
    pub const CREATE: &str = "/createActivity";

    pub fn activity(id: &ActivityId) -> String {
        format!("/activities/{}", id)
    }
    pub fn manage(id: &ActivityId) -> String {
        format!("/manage/{}", id)
    }
}
