use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::{Db, Tree};

use activities_common::ActivityId;

use crate::error::{RestError, Result};
use crate::records::{ActivityRecord, AppUser};

/// sled-backed store holding activities and users as JSON values.
#[derive(Clone)]
pub struct DataContext {
    activities: Tree,
    users: Tree,
}

impl DataContext {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path).with_context(|| format!("opening database at {}", path.display()))?;
        Self::from_db(&db)
    }

    /// In-memory database removed on drop.
    pub fn temporary() -> anyhow::Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(&db)
    }

    fn from_db(db: &Db) -> anyhow::Result<Self> {
        Ok(Self {
            activities: db.open_tree("activities")?,
            users: db.open_tree("users")?,
        })
    }

    pub fn activities(&self) -> Result<Vec<ActivityRecord>> {
        self.activities
            .iter()
            .values()
            .map(|value| -> Result<ActivityRecord> { Ok(serde_json::from_slice(&value?)?) })
            .collect()
    }

    pub fn find_activity(&self, id: &ActivityId) -> Result<Option<ActivityRecord>> {
        get(&self.activities, id.as_str())
    }

    pub fn activity(&self, id: &ActivityId) -> Result<ActivityRecord> {
        Ok(self.find_activity(id)?.ok_or(RestError::NotFound("activity"))?)
    }

    pub fn insert_activity(&self, record: &ActivityRecord) -> Result<()> {
        put(&self.activities, record.id.as_str(), record)
    }

    /// Returns whether the id was present.
    pub fn remove_activity(&self, id: &ActivityId) -> Result<bool> {
        Ok(self.activities.remove(id.as_str())?.is_some())
    }

    /// Stores a new activity. Returns false, writing nothing, when the id is taken.
    pub fn insert_new_activity(&self, record: &ActivityRecord) -> Result<bool> {
        let swapped = self.activities.compare_and_swap(
            record.id.as_str(),
            None as Option<&[u8]>,
            Some(serde_json::to_vec(record)?),
        )?;
        Ok(swapped.is_ok())
    }

    /// Loads an activity, lets `func` change it and swaps it back in only if
    /// nobody wrote it meanwhile; on a conflict `func` runs again on the fresh
    /// record. Nothing is written when `func` fails or the activity is gone.
    pub fn activity_mut(
        &self,
        id: &ActivityId,
        mut func: impl FnMut(&mut ActivityRecord) -> Result<()>,
    ) -> Result<ActivityRecord> {
        let key = id.as_str();
        let mut current = self.activities.get(key)?;
        loop {
            let old = current.ok_or(RestError::NotFound("activity"))?;
            let mut record: ActivityRecord = serde_json::from_slice(&old)?;
            func(&mut record)?;
            let new = serde_json::to_vec(&record)?;
            match self.activities.compare_and_swap(key, Some(&old), Some(new))? {
                Ok(()) => return Ok(record),
                Err(conflict) => {
                    tracing::debug!(id = key, "activity changed concurrently, retrying");
                    current = conflict.current;
                }
            }
        }
    }

    pub fn find_user(&self, username: &str) -> Result<Option<AppUser>> {
        get(&self.users, username)
    }

    pub fn user(&self, username: &str) -> Result<AppUser> {
        Ok(self.find_user(username)?.ok_or(RestError::NotFound("user"))?)
    }

    pub fn upsert_user(&self, user: &AppUser) -> Result<()> {
        put(&self.users, &user.username, user)
    }

    /// Profile lookup used by the DTO mapping; storage errors read as absent.
    pub fn lookup_user(&self, username: &str) -> Option<AppUser> {
        match self.find_user(username) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(username, error = %err.0, "user lookup failed");
                None
            }
        }
    }
}

fn get<T: DeserializeOwned>(tree: &Tree, key: &str) -> Result<Option<T>> {
    match tree.get(key)? {
        Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
        None => Ok(None),
    }
}

fn put<T: Serialize>(tree: &Tree, key: &str, value: &T) -> Result<()> {
    tree.insert(key, serde_json::to_vec(value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::UserActivity;
    use chrono::{TimeZone, Utc};

    fn record(id: &str) -> ActivityRecord {
        ActivityRecord {
            id: ActivityId::from(id),
            title: "Film night".into(),
            description: "Noir".into(),
            category: "film".into(),
            date: Utc.with_ymd_and_hms(2024, 4, 1, 20, 0, 0).unwrap(),
            city: "Rome".into(),
            venue: "Cinema".into(),
            attendees: vec![],
        }
    }

    #[test]
    fn activity_mut_leaves_record_on_failure() -> anyhow::Result<()> {
        let ctx = DataContext::temporary()?;
        ctx.insert_activity(&record("x")).map_err(|e| e.0)?;

        let result = ctx.activity_mut(&ActivityId::from("x"), |r| {
            r.title = "changed".into();
            Err(RestError::bad_request("title", "nope").into())
        });
        assert!(result.is_err());
        assert_eq!(ctx.activity(&ActivityId::from("x")).map_err(|e| e.0)?.title, "Film night");

        ctx.activity_mut(&ActivityId::from("x"), |r| {
            r.attendees.push(UserActivity {
                username: "bob".into(),
                is_host: false,
                date_joined: Utc::now(),
            });
            Ok(())
        })
        .map_err(|e| e.0)?;
        assert_eq!(ctx.activity(&ActivityId::from("x")).map_err(|e| e.0)?.attendees.len(), 1);
        Ok(())
    }

    #[test]
    fn activity_mut_retries_on_conflicting_write() -> anyhow::Result<()> {
        let ctx = DataContext::temporary()?;
        ctx.insert_activity(&record("x")).map_err(|e| e.0)?;

        let mut runs = 0;
        let saved = ctx
            .activity_mut(&ActivityId::from("x"), |r| {
                runs += 1;
                if runs == 1 {
                    let mut other = r.clone();
                    other.venue = "Open air".into();
                    ctx.insert_activity(&other)?;
                }
                r.title = "changed".into();
                Ok(())
            })
            .map_err(|e| e.0)?;

        assert_eq!(runs, 2);
        let stored = ctx.activity(&ActivityId::from("x")).map_err(|e| e.0)?;
        assert_eq!(stored, saved);
        assert_eq!(stored.title, "changed");
        assert_eq!(stored.venue, "Open air");
        Ok(())
    }

    #[test]
    fn activity_mut_does_not_resurrect_deleted_activity() -> anyhow::Result<()> {
        let ctx = DataContext::temporary()?;
        ctx.insert_activity(&record("x")).map_err(|e| e.0)?;

        let err = ctx
            .activity_mut(&ActivityId::from("x"), |r| {
                ctx.remove_activity(&r.id)?;
                r.title = "changed".into();
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err.rest(), Some(RestError::NotFound("activity"))));
        assert!(ctx.find_activity(&ActivityId::from("x")).map_err(|e| e.0)?.is_none());
        Ok(())
    }

    #[test]
    fn insert_new_refuses_taken_id() -> anyhow::Result<()> {
        let ctx = DataContext::temporary()?;
        assert!(ctx.insert_new_activity(&record("x")).map_err(|e| e.0)?);
        let mut second = record("x");
        second.title = "other".into();
        assert!(!ctx.insert_new_activity(&second).map_err(|e| e.0)?);
        assert_eq!(ctx.activity(&ActivityId::from("x")).map_err(|e| e.0)?.title, "Film night");
        Ok(())
    }

    #[test]
    fn missing_activity_is_not_found() -> anyhow::Result<()> {
        let ctx = DataContext::temporary()?;
        let err = ctx.activity(&ActivityId::from("nope")).unwrap_err();
        assert!(matches!(err.rest(), Some(RestError::NotFound("activity"))));
        assert!(!ctx.remove_activity(&ActivityId::from("nope")).map_err(|e| e.0)?);
        Ok(())
    }
}
