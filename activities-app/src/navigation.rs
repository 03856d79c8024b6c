use std::sync::{Arc, Mutex, MutexGuard};

use activities_client::{Navigator, Notifier};
use activities_common::{routes, ActivityId};

/// Which screen a route string selects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Detail(ActivityId),
    Create,
    Manage(ActivityId),
}

impl View {
    pub fn parse(route: &str) -> View {
        let route = route.trim_end_matches('/');
        if route == routes::CREATE {
            return View::Create;
        }
        if let Some(id) = route.strip_prefix("/activities/").filter(|id| !id.is_empty()) {
            return View::Detail(ActivityId::from(id));
        }
        if let Some(id) = route.strip_prefix("/manage/").filter(|id| !id.is_empty()) {
            return View::Manage(ActivityId::from(id));
        }
        View::Dashboard
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the current route; the app re-reads it every frame.
#[derive(Clone)]
pub struct RouteNavigator {
    route: Arc<Mutex<String>>,
}

impl RouteNavigator {
    pub fn new(initial: &str) -> Self {
        Self {
            route: Arc::new(Mutex::new(initial.to_string())),
        }
    }

    pub fn current(&self) -> String {
        lock(&self.route).clone()
    }
}

impl Navigator for RouteNavigator {
    fn go_to(&self, path: &str) {
        tracing::debug!(path, "navigate");
        *lock(&self.route) = path.to_string();
    }
}

/// Messages waiting to be shown as toasts on the next frame.
#[derive(Clone, Default)]
pub struct ToastQueue {
    pending: Arc<Mutex<Vec<String>>>,
}

impl ToastQueue {
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.pending))
    }
}

impl Notifier for ToastQueue {
    fn error(&self, message: &str) {
        lock(&self.pending).push(message.to_string());
    }
}
