use chrono::{NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

use activities_common::{Activity, ActivityId};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Transient text inputs of the create/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: String,
    pub city: String,
    pub venue: String,
}

impl ActivityForm {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            title: activity.title.clone(),
            description: activity.description.clone(),
            category: activity.category.clone(),
            date: activity.date.format(DATE_FORMAT).to_string(),
            city: activity.city.clone(),
            venue: activity.venue.clone(),
        }
    }

    /// Builds the activity to submit. Editing keeps the id and attendees of
    /// `existing`; creating gets a fresh v4 id.
    pub fn to_activity(&self, existing: Option<&Activity>) -> Result<Activity, String> {
        let naive = NaiveDateTime::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| format!("Date must look like {}", Utc::now().format(DATE_FORMAT)))?;
        let date = Utc.from_utc_datetime(&naive);
        let (id, attendees, is_host, is_going) = match existing {
            Some(activity) => (activity.id.clone(), activity.attendees.clone(), activity.is_host, activity.is_going),
            None => (ActivityId(Uuid::new_v4().to_string()), Vec::new(), false, false),
        };
        Ok(Activity {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            date,
            city: self.city.trim().to_string(),
            venue: self.venue.trim().to_string(),
            attendees,
            is_host,
            is_going,
        })
    }
}
