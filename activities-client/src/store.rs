use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use activities_common::{group_by_date, routes, Activity, ActivityId, Attendee, DateGroup, User};

use crate::error::GatewayError;
use crate::gateway::ActivityGateway;

pub const SUBMIT_FAILED: &str = "Problem submitting data";
pub const DELETE_FAILED: &str = "Problem deleting activity";
pub const ATTEND_FAILED: &str = "Problem signing up to activity";
pub const UNATTEND_FAILED: &str = "Problem cancelling attendance";

/// Moves the presentation to another route.
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Shows user-facing failure messages.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Everything presentation code renders from. Published as a whole on every change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreState {
    pub registry: HashMap<ActivityId, Activity>,
    /// The activity the detail view is showing.
    pub activity: Option<Activity>,
    pub loading_initial: bool,
    pub submitting: bool,
    pub loading: bool,
    /// Name of the control whose action is in flight, empty when none.
    pub target: String,
}

impl StoreState {
    pub fn activities_by_date(&self) -> Vec<DateGroup> {
        group_by_date(self.registry.values())
    }

    pub fn get(&self, id: &ActivityId) -> Option<&Activity> {
        self.registry.get(id)
    }

    /// Applies `func` to the cached entry and to the selection when it is the same activity.
    fn modify_activity(&mut self, id: &ActivityId, mut func: impl FnMut(&mut Activity)) {
        if let Some(activity) = self.registry.get_mut(id) {
            func(activity);
        }
        if let Some(activity) = self.activity.as_mut().filter(|a| &a.id == id) {
            func(activity);
        }
    }
}

/// Client-side cache of activities. All mutations go through the gateway and
/// touch local state only once the remote call has succeeded; failures reset
/// the in-flight flags and are reported through the notifier, never returned.
pub struct ActivityStore<G> {
    gateway: G,
    user: User,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<StoreState>,
}

impl<G: ActivityGateway> ActivityStore<G> {
    pub fn new(gateway: G, user: User, navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            gateway,
            user,
            navigator,
            notifier,
            state,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn list(&self) -> Vec<DateGroup> {
        self.state.borrow().activities_by_date()
    }

    pub fn get(&self, id: &ActivityId) -> Option<Activity> {
        self.state.borrow().get(id).cloned()
    }

    pub fn current(&self) -> Option<Activity> {
        self.state.borrow().activity.clone()
    }

    pub fn clear_selection(&self) {
        self.update(|state| state.activity = None);
    }

    fn update(&self, func: impl FnOnce(&mut StoreState)) {
        self.state.send_modify(func);
    }

    fn fail(&self, message: Option<&str>, err: &GatewayError, reset: impl FnOnce(&mut StoreState)) {
        tracing::warn!(error = %err, "activity request failed");
        self.update(reset);
        if let Some(message) = message {
            self.notifier.error(message);
        }
    }

    pub async fn load_all(&self) {
        self.update(|state| state.loading_initial = true);
        match self.gateway.list().await {
            Ok(activities) => self.update(|state| {
                for mut activity in activities {
                    activity.decorate_for(&self.user);
                    state.registry.insert(activity.id.clone(), activity);
                }
                state.loading_initial = false;
            }),
            Err(err) => self.fail(None, &err, |state| state.loading_initial = false),
        }
    }

    /// Returns the cached activity without a network call when present.
    pub async fn load_one(&self, id: &ActivityId) -> Option<Activity> {
        if let Some(activity) = self.get(id) {
            self.update(|state| state.activity = Some(activity.clone()));
            return Some(activity);
        }
        self.update(|state| state.loading_initial = true);
        match self.gateway.detail(id).await {
            Ok(mut activity) => {
                activity.decorate_for(&self.user);
                self.update(|state| {
                    state.registry.insert(activity.id.clone(), activity.clone());
                    state.activity = Some(activity.clone());
                    state.loading_initial = false;
                });
                Some(activity)
            }
            Err(err) => {
                self.fail(None, &err, |state| state.loading_initial = false);
                None
            }
        }
    }

    pub async fn create(&self, mut activity: Activity) {
        let mut host = Attendee::for_user(&self.user);
        host.is_host = true;
        activity.attendees = vec![host];
        activity.is_host = true;
        activity.is_going = true;

        self.update(|state| state.submitting = true);
        match self.gateway.create(&activity).await {
            Ok(()) => {
                let path = routes::activity(&activity.id);
                self.update(|state| {
                    state.registry.insert(activity.id.clone(), activity);
                    state.submitting = false;
                });
                self.navigator.go_to(&path);
            }
            Err(err) => self.fail(Some(SUBMIT_FAILED), &err, |state| state.submitting = false),
        }
    }

    pub async fn edit(&self, mut activity: Activity) {
        self.update(|state| state.submitting = true);
        match self.gateway.update(&activity).await {
            Ok(()) => {
                activity.decorate_for(&self.user);
                let path = routes::activity(&activity.id);
                self.update(|state| {
                    state.registry.insert(activity.id.clone(), activity.clone());
                    state.activity = Some(activity);
                    state.submitting = false;
                });
                self.navigator.go_to(&path);
            }
            Err(err) => self.fail(Some(SUBMIT_FAILED), &err, |state| state.submitting = false),
        }
    }

    /// `target` names the control that triggered the delete.
    pub async fn delete(&self, id: &ActivityId, target: impl Into<String>) {
        let target = target.into();
        self.update(|state| {
            state.submitting = true;
            state.target = target;
        });
        let reset = |state: &mut StoreState| {
            state.submitting = false;
            state.target.clear();
        };
        match self.gateway.delete(id).await {
            Ok(()) => self.update(|state| {
                state.registry.remove(id);
                if state.activity.as_ref().map_or(false, |a| &a.id == id) {
                    state.activity = None;
                }
                reset(state);
            }),
            Err(err) => self.fail(Some(DELETE_FAILED), &err, reset),
        }
    }

    pub async fn attend(&self) {
        let Some(current) = self.current() else {
            tracing::warn!("attend called without a selected activity");
            return;
        };
        let attendee = Attendee::for_user(&self.user);
        self.update(|state| state.loading = true);
        match self.gateway.attend(&current.id).await {
            Ok(()) => self.update(|state| {
                state.modify_activity(&current.id, |activity| {
                    if !activity.attendees.iter().any(|a| a.username == attendee.username) {
                        activity.attendees.push(attendee.clone());
                    }
                    activity.is_going = true;
                });
                state.loading = false;
            }),
            Err(err) => self.fail(Some(ATTEND_FAILED), &err, |state| state.loading = false),
        }
    }

    pub async fn unattend(&self) {
        let Some(current) = self.current() else {
            tracing::warn!("unattend called without a selected activity");
            return;
        };
        let username = self.user.username.clone();
        self.update(|state| state.loading = true);
        match self.gateway.unattend(&current.id).await {
            Ok(()) => self.update(|state| {
                state.modify_activity(&current.id, |activity| {
                    activity.attendees.retain(|a| a.username != username);
                    activity.is_going = false;
                });
                state.loading = false;
            }),
            Err(err) => self.fail(Some(UNATTEND_FAILED), &err, |state| state.loading = false),
        }
    }
}
