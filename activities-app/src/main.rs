mod form;
mod navigation;

use std::sync::Arc;

use anyhow::Result;
use eframe::{egui, Frame};
use eframe::emath::Align2;
use egui::{Context, RichText, Ui, WidgetText};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use activities_client::{ActivityStore, HttpGateway, Navigator, Notifier, StoreState};
use activities_common::{routes, Activity, ActivityId, NewUser};

use form::ActivityForm;
use navigation::{RouteNavigator, ToastQueue, View};

const DEFAULT_API: &str = "http://127.0.0.1:5000/api";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let api = std::env::var("ACTIVITIES_API").unwrap_or_else(|_| DEFAULT_API.to_string());

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(720.0, 640.0)),
        ..Default::default()
    };
    let rt = tokio::runtime::Runtime::new()?;
    eframe::run_native(
        "Activities",
        options,
        Box::new(|_cc| Box::new(ActivitiesApp::new(rt, api))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))?;
    Ok(())
}

/// Things the user asked for while a frame was being drawn.
enum Action {
    Navigate(String),
    Delete(ActivityId, String),
    Attend,
    Unattend,
    Submit(Activity, bool),
}

struct ActivitiesApp {
    runtime: Runtime,
    api: String,
    username_entry: String,
    display_name_entry: String,
    store: Option<Arc<ActivityStore<HttpGateway>>>,
    navigator: RouteNavigator,
    notices: ToastQueue,
    toasts: Toasts,
    form: ActivityForm,
    /// Manage view waiting for its activity to arrive before filling the form.
    form_pending: Option<ActivityId>,
    shown_route: String,
}

impl ActivitiesApp {
    fn new(runtime: Runtime, api: String) -> Self {
        Self {
            runtime,
            api,
            username_entry: "".to_string(),
            display_name_entry: "".to_string(),
            store: None,
            navigator: RouteNavigator::new(routes::DASHBOARD),
            notices: ToastQueue::default(),
            toasts: Toasts::new()
                .anchor(Align2::LEFT_TOP, (10.0, 10.0))
                .direction(egui::Direction::TopDown),
            form: ActivityForm::default(),
            form_pending: None,
            shown_route: String::new(),
        }
    }

    fn login(&mut self, ctx: &Context) {
        let new_user = NewUser {
            username: self.username_entry.trim().to_string(),
            display_name: self.display_name_entry.trim().to_string(),
            image: None,
        };
        if new_user.username.is_empty() {
            self.notices.error("Enter a username");
            return;
        }
        match self.runtime.block_on(HttpGateway::login(self.api.clone(), &new_user)) {
            Ok((gateway, user)) => {
                tracing::info!(username = %user.username, "logged in");
                let navigator: Arc<dyn Navigator> = Arc::new(self.navigator.clone());
                let notifier: Arc<dyn Notifier> = Arc::new(self.notices.clone());
                let store = Arc::new(ActivityStore::new(gateway, user, navigator, notifier));

                let mut changes = store.subscribe();
                let ctx = ctx.clone();
                self.runtime.spawn(async move {
                    while changes.changed().await.is_ok() {
                        ctx.request_repaint();
                    }
                });
                self.spawn(&store, |store| async move { store.load_all().await });
                self.store = Some(store);
                self.shown_route.clear();
                self.navigator.go_to(routes::DASHBOARD);
            }
            Err(err) => {
                tracing::warn!(error = %err, "login failed");
                self.notices.error(&format!("Could not log in: {err}"));
            }
        }
    }

    fn spawn<F, Fut>(&self, store: &Arc<ActivityStore<HttpGateway>>, func: F)
    where
        F: FnOnce(Arc<ActivityStore<HttpGateway>>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(func(store.clone()));
    }

    /// Runs the loads a route needs the first time it becomes active.
    fn enter_route(&mut self, store: &Arc<ActivityStore<HttpGateway>>, view: &View) {
        match view {
            View::Dashboard => store.clear_selection(),
            View::Create => {
                store.clear_selection();
                self.form = ActivityForm::default();
            }
            View::Detail(id) => {
                let id = id.clone();
                self.spawn(store, |store| async move {
                    store.load_one(&id).await;
                });
            }
            View::Manage(id) => {
                self.form_pending = Some(id.clone());
                let id = id.clone();
                self.spawn(store, |store| async move {
                    store.load_one(&id).await;
                });
            }
        }
    }

    fn apply(&mut self, store: &Arc<ActivityStore<HttpGateway>>, action: Action) {
        match action {
            Action::Navigate(path) => self.navigator.go_to(&path),
            Action::Delete(id, target) => self.spawn(store, |store| async move {
                store.delete(&id, target).await;
            }),
            Action::Attend => self.spawn(store, |store| async move { store.attend().await }),
            Action::Unattend => self.spawn(store, |store| async move { store.unattend().await }),
            Action::Submit(activity, true) => self.spawn(store, |store| async move { store.edit(activity).await }),
            Action::Submit(activity, false) => self.spawn(store, |store| async move { store.create(activity).await }),
        }
    }

    fn login_panel(&mut self, ui: &mut Ui, ctx: &Context) {
        ui.heading("Activities");
        ui.label("Username");
        ui.text_edit_singleline(&mut self.username_entry);
        ui.label("Display name");
        ui.text_edit_singleline(&mut self.display_name_entry);
        if ui.button("login").clicked() {
            self.login(ctx);
        }
    }
}

fn dashboard(ui: &mut Ui, state: &StoreState, actions: &mut Vec<Action>) {
    ui.horizontal(|ui| {
        ui.heading("Activities");
        if ui.button("Create activity").clicked() {
            actions.push(Action::Navigate(routes::CREATE.to_string()));
        }
    });
    if state.loading_initial {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading activities...");
        });
    }
    egui::ScrollArea::vertical().show(ui, |ui| {
        for group in state.activities_by_date() {
            ui.separator();
            ui.label(RichText::new(group.date.format("%A %-d %B %Y").to_string()).strong());
            for activity in &group.activities {
                activity_item(ui, state, activity, actions);
            }
        }
    });
}

fn activity_item(ui: &mut Ui, state: &StoreState, activity: &Activity, actions: &mut Vec<Action>) {
    ui.group(|ui| {
        ui.label(RichText::new(activity.title.as_str()).strong());
        if let Some(host) = activity.host() {
            ui.label(format!("Hosted by {}", host.display_name));
        }
        if activity.is_host {
            ui.colored_label(egui::Color32::from_rgb(242, 113, 28), "You are hosting this activity");
        } else if activity.is_going {
            ui.colored_label(egui::Color32::from_rgb(33, 186, 69), "You are attending this activity");
        }
        ui.label(format!("{}  {}, {}", activity.date.format("%H:%M"), activity.venue, activity.city));
        ui.label(format!("{} going", activity.attendees.len()));
        ui.horizontal(|ui| {
            if ui.button("View").clicked() {
                actions.push(Action::Navigate(routes::activity(&activity.id)));
            }
            let target = format!("delete-{}", activity.id);
            let label = if state.submitting && state.target == target { "Deleting..." } else { "Delete" };
            if ui.add_enabled(!state.submitting, egui::Button::new(label)).clicked() {
                actions.push(Action::Delete(activity.id.clone(), target));
            }
            ui.label(activity.category.as_str());
        });
    });
}

fn detail(ui: &mut Ui, state: &StoreState, id: &ActivityId, actions: &mut Vec<Action>) {
    if ui.button("Back").clicked() {
        actions.push(Action::Navigate(routes::DASHBOARD.to_string()));
    }
    let Some(activity) = state.activity.as_ref().filter(|a| &a.id == id) else {
        if state.loading_initial {
            ui.spinner();
        } else {
            ui.label("Activity not found");
        }
        return;
    };
    ui.heading(activity.title.as_str());
    ui.label(activity.date.format("%A %-d %B %Y, %H:%M").to_string());
    ui.label(format!("{}, {}", activity.venue, activity.city));
    ui.label(activity.description.as_str());
    ui.separator();
    ui.label(RichText::new(format!("{} going", activity.attendees.len())).strong());
    for attendee in &activity.attendees {
        let tag = if attendee.is_host { " (Host)" } else { "" };
        ui.label(format!("{}{}", attendee.display_name, tag));
    }
    ui.separator();
    ui.horizontal(|ui| {
        if activity.is_host {
            if ui.button("Manage event").clicked() {
                actions.push(Action::Navigate(routes::manage(&activity.id)));
            }
        } else if activity.is_going {
            if ui.add_enabled(!state.loading, egui::Button::new("Cancel attendance")).clicked() {
                actions.push(Action::Unattend);
            }
        } else if ui.add_enabled(!state.loading, egui::Button::new("Join activity")).clicked() {
            actions.push(Action::Attend);
        }
        if state.loading {
            ui.spinner();
        }
    });
}

fn activity_form(
    ui: &mut Ui,
    form: &mut ActivityForm,
    existing: Option<&Activity>,
    submitting: bool,
    notices: &ToastQueue,
    actions: &mut Vec<Action>,
) {
    ui.heading(if existing.is_some() { "Edit activity" } else { "Create activity" });
    egui::Grid::new("activity-form").num_columns(2).show(ui, |ui| {
        ui.label("Title");
        ui.text_edit_singleline(&mut form.title);
        ui.end_row();
        ui.label("Description");
        ui.text_edit_multiline(&mut form.description);
        ui.end_row();
        ui.label("Category");
        ui.text_edit_singleline(&mut form.category);
        ui.end_row();
        ui.label("Date (YYYY-MM-DD HH:MM)");
        ui.text_edit_singleline(&mut form.date);
        ui.end_row();
        ui.label("City");
        ui.text_edit_singleline(&mut form.city);
        ui.end_row();
        ui.label("Venue");
        ui.text_edit_singleline(&mut form.venue);
        ui.end_row();
    });
    ui.horizontal(|ui| {
        let label = if submitting { "Submitting..." } else { "Submit" };
        if ui.add_enabled(!submitting, egui::Button::new(label)).clicked() {
            match form.to_activity(existing) {
                Ok(activity) => actions.push(Action::Submit(activity, existing.is_some())),
                Err(message) => notices.error(&message),
            }
        }
        if ui.button("Cancel").clicked() {
            let back = existing.map(|a| routes::activity(&a.id)).unwrap_or_else(|| routes::DASHBOARD.to_string());
            actions.push(Action::Navigate(back));
        }
    });
}

impl eframe::App for ActivitiesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        for message in self.notices.drain() {
            self.toasts.add(Toast {
                kind: ToastKind::Error,
                text: WidgetText::from(message),
                options: ToastOptions::default()
                    .duration_in_seconds(3.0)
                    .show_progress(true)
                    .show_icon(true),
            });
        }

        let Some(store) = self.store.clone() else {
            egui::CentralPanel::default().show(ctx, |ui| self.login_panel(ui, ctx));
            self.toasts.show(ctx);
            return;
        };

        let route = self.navigator.current();
        let view = View::parse(&route);
        if route != self.shown_route {
            self.enter_route(&store, &view);
            self.shown_route = route;
        }

        let state = store.snapshot();
        if let View::Manage(id) = &view {
            if self.form_pending.as_ref() == Some(id) {
                if let Some(activity) = state.activity.as_ref().filter(|a| &a.id == id) {
                    self.form = ActivityForm::from_activity(activity);
                    self.form_pending = None;
                }
            }
        }

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Signed in as {}", store.user().display_name));
            });
            ui.separator();
            match &view {
                View::Dashboard => dashboard(ui, &state, &mut actions),
                View::Detail(id) => detail(ui, &state, id, &mut actions),
                View::Create => activity_form(ui, &mut self.form, None, state.submitting, &self.notices, &mut actions),
                View::Manage(id) => {
                    let existing = state.activity.as_ref().filter(|a| &a.id == id);
                    if existing.is_none() {
                        ui.spinner();
                    } else {
                        activity_form(ui, &mut self.form, existing, state.submitting, &self.notices, &mut actions);
                    }
                }
            }
        });
        for action in actions {
            self.apply(&store, action);
        }
        self.toasts.show(ctx);
    }
}
