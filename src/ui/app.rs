use chrono::{DateTime, Local, Utc};

use crate::core::error::ConsoleError;
use crate::core::types::{Incident, IncidentDetail, IncidentUpdate, Severity};
use crate::pipeline::filter::{filter_incidents, StatusFilter, TimeRange};
use crate::pipeline::paginate::{paginate, total_pages};
use crate::pipeline::poller::{LoadOrigin, PollEvent};

const MAX_LOGS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Id,
    Password,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub field: AuthField,
    pub id: String,
    pub password: String,
    pub allow_signup: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            field: AuthField::Id,
            id: String::new(),
            password: String::new(),
            allow_signup: false,
            submitting: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Severity,
    Status,
    Summary,
    Detail,
}

impl EditField {
    fn next(self) -> Self {
        match self {
            EditField::Title => EditField::Severity,
            EditField::Severity => EditField::Status,
            EditField::Status => EditField::Summary,
            EditField::Summary => EditField::Detail,
            EditField::Detail => EditField::Title,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditField::Title => "Title",
            EditField::Severity => "Severity",
            EditField::Status => "Status",
            EditField::Summary => "Summary",
            EditField::Detail => "Detailed analysis",
        }
    }

    fn multiline(&self) -> bool {
        matches!(self, EditField::Summary | EditField::Detail)
    }
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub incident_id: String,
    pub detail: Option<IncidentDetail>,
    pub form: Option<IncidentDetail>,
    pub editing: bool,
    pub edit_on_load: bool,
    pub field: EditField,
    pub loading: bool,
    pub saving: bool,
    pub confirm_hide: bool,
    pub error: Option<String>,
    pub scroll: u16,
}

/// Work the runtime should perform on behalf of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Login { id: String, password: String },
    Register { id: String, password: String },
    Logout,
    LoadList,
    LoadDetail { generation: u64, id: String },
    Save { generation: u64, id: String, update: IncidentUpdate },
    Hide { generation: u64, id: String },
}

/// Dashboard state. Holds no I/O; every async step is requested through an
/// [`Action`] and its result fed back through one of the `*_result` methods.
pub struct App {
    pub screen: Screen,
    pub auth: AuthForm,
    pub incidents: Vec<Incident>,
    pub time_range: TimeRange,
    pub status_filter: StatusFilter,
    pub page: usize,
    pub page_size: usize,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub detail: Option<DetailView>,
    pub show_help: bool,
    pub logs: Vec<String>,
    /// Bumped whenever the detail view changes owner; stale results are dropped.
    pub view_generation: u64,
    pub tick: usize,
}

impl App {
    pub fn new(time_range: TimeRange, page_size: usize) -> Self {
        Self {
            screen: Screen::Auth,
            auth: AuthForm::default(),
            incidents: Vec::new(),
            time_range,
            status_filter: StatusFilter::All,
            page: 1,
            page_size: page_size.max(1),
            selected: 0,
            loading: false,
            error: None,
            notice: None,
            detail: None,
            show_help: false,
            logs: vec!["[SYSTEM] RCA console ready".to_string()],
            view_generation: 0,
            tick: 0,
        }
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.logs
            .push(format!("[{}] {}", Local::now().format("%H:%M:%S"), msg.into()));
        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
        }
    }

    // ── derived list ────────────────────────────────────────────────────

    pub fn visible(&self, now: DateTime<Utc>) -> Vec<Incident> {
        filter_incidents(&self.incidents, self.time_range, self.status_filter, now)
    }

    pub fn total_pages(&self, now: DateTime<Utc>) -> usize {
        total_pages(self.visible(now).len(), self.page_size)
    }

    pub fn page_items(&self, now: DateTime<Utc>) -> Vec<Incident> {
        paginate(&self.visible(now), self.page, self.page_size).to_vec()
    }

    pub fn selected_incident(&self, now: DateTime<Utc>) -> Option<Incident> {
        self.page_items(now).get(self.selected).cloned()
    }

    // ── auth screen ─────────────────────────────────────────────────────

    pub fn set_allow_signup(&mut self, allow: bool) {
        self.auth.allow_signup = allow;
        if !allow {
            self.auth.mode = AuthMode::Login;
        }
    }

    pub fn toggle_auth_mode(&mut self) {
        if !self.auth.allow_signup {
            self.auth.error = Some("Sign-up is disabled on this server.".into());
            return;
        }
        self.auth.mode = match self.auth.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.auth.error = None;
    }

    pub fn next_auth_field(&mut self) {
        self.auth.field = match self.auth.field {
            AuthField::Id => AuthField::Password,
            AuthField::Password => AuthField::Id,
        };
    }

    pub fn submit_auth(&mut self) -> Action {
        if self.auth.submitting {
            return Action::None;
        }
        if self.auth.id.trim().is_empty() || self.auth.password.is_empty() {
            self.auth.error = Some("ID and password are required.".into());
            return Action::None;
        }
        self.auth.submitting = true;
        self.auth.error = None;
        let id = self.auth.id.trim().to_string();
        let password = self.auth.password.clone();
        match self.auth.mode {
            AuthMode::Login => Action::Login { id, password },
            AuthMode::Register => Action::Register { id, password },
        }
    }

    /// Moves to the list and asks for the first foreground load.
    pub fn auth_result(&mut self, result: Result<(), ConsoleError>) -> Action {
        self.auth.submitting = false;
        match result {
            Ok(()) => {
                self.auth.password.clear();
                self.auth.error = None;
                self.screen = Screen::List;
                self.page = 1;
                self.selected = 0;
                self.log(format!("[AUTH] signed in as {}", self.auth.id));
                self.begin_load()
            }
            Err(err) => {
                self.auth.error = Some(match (&err, self.auth.mode) {
                    (ConsoleError::Unauthorized, AuthMode::Login) => {
                        "Login failed. Check your ID and password.".to_string()
                    }
                    (ConsoleError::Validation(msg), _) => msg.clone(),
                    _ => err.user_message(),
                });
                Action::None
            }
        }
    }

    pub fn logout(&mut self) -> Action {
        self.reset_to_auth(None);
        self.log("[AUTH] signed out");
        Action::Logout
    }

    /// Session is gone: drop everything that belonged to it.
    pub fn force_logout(&mut self) {
        self.reset_to_auth(Some("Session expired. Please sign in again.".into()));
        self.log("[AUTH] session expired");
    }

    fn reset_to_auth(&mut self, error: Option<String>) {
        self.screen = Screen::Auth;
        self.incidents.clear();
        self.detail = None;
        self.loading = false;
        self.error = None;
        self.notice = None;
        self.page = 1;
        self.selected = 0;
        self.view_generation += 1;
        self.auth.password.clear();
        self.auth.submitting = false;
        self.auth.error = error;
    }

    // ── list screen ─────────────────────────────────────────────────────

    pub fn begin_load(&mut self) -> Action {
        self.loading = true;
        self.error = None;
        Action::LoadList
    }

    /// Applies a list fetch. Returns false when the event was stale.
    pub fn list_result(&mut self, event: PollEvent, current_generation: u64, now: DateTime<Utc>) -> bool {
        if event.generation != current_generation || self.screen == Screen::Auth {
            tracing::debug!("dropping stale list result (generation {})", event.generation);
            return false;
        }
        let foreground = event.origin == LoadOrigin::Foreground;
        if foreground {
            self.loading = false;
        }
        match event.result {
            Ok(incidents) => {
                self.incidents = incidents;
                self.error = None;
                if foreground {
                    self.log(format!("[DATA] {} incidents loaded", self.incidents.len()));
                }
                self.clamp_page(now);
            }
            Err(ConsoleError::Unauthorized) => self.force_logout(),
            Err(err) => {
                if foreground {
                    tracing::warn!("incident list load failed: {}", err);
                    self.error = Some(err.user_message());
                    self.log(format!("[DATA] load failed: {}", err));
                } else {
                    tracing::warn!("background incident refresh failed: {}", err);
                }
            }
        }
        true
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.time_range = range;
        self.reset_page();
    }

    pub fn cycle_time_range(&mut self) {
        self.set_time_range(self.time_range.next());
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.status_filter = status;
        self.reset_page();
    }

    pub fn cycle_status_filter(&mut self) {
        self.set_status_filter(self.status_filter.next());
    }

    fn reset_page(&mut self) {
        self.page = 1;
        self.selected = 0;
    }

    pub fn next_page(&mut self, now: DateTime<Utc>) {
        if self.page < self.total_pages(now) {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self, now: DateTime<Utc>) {
        let len = self.page_items(now).len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self, now: DateTime<Utc>) {
        let len = self.page_items(now).len();
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
    }

    fn clamp_page(&mut self, now: DateTime<Utc>) {
        let pages = self.total_pages(now);
        self.page = self.page.clamp(1, pages.max(1));
        let len = self.page_items(now).len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    // ── detail screen ───────────────────────────────────────────────────

    pub fn open_selected(&mut self, now: DateTime<Utc>, edit: bool) -> Action {
        match self.selected_incident(now) {
            Some(incident) => self.open_detail(incident.incident_id, edit),
            None => Action::None,
        }
    }

    pub fn open_detail(&mut self, id: String, edit: bool) -> Action {
        self.view_generation += 1;
        self.screen = Screen::Detail;
        self.detail = Some(DetailView {
            incident_id: id.clone(),
            detail: None,
            form: None,
            editing: false,
            edit_on_load: edit,
            field: EditField::Title,
            loading: true,
            saving: false,
            confirm_hide: false,
            error: None,
            scroll: 0,
        });
        Action::LoadDetail {
            generation: self.view_generation,
            id,
        }
    }

    pub fn reload_detail(&mut self) -> Action {
        let Some(view) = self.detail.as_mut() else {
            return Action::None;
        };
        if view.editing {
            return Action::None;
        }
        view.loading = true;
        view.error = None;
        Action::LoadDetail {
            generation: self.view_generation,
            id: view.incident_id.clone(),
        }
    }

    pub fn back_to_list(&mut self) {
        self.view_generation += 1;
        self.detail = None;
        self.screen = Screen::List;
    }

    pub fn detail_result(
        &mut self,
        generation: u64,
        result: Result<IncidentDetail, ConsoleError>,
    ) -> bool {
        if generation != self.view_generation {
            return false;
        }
        if matches!(result, Err(ConsoleError::Unauthorized)) {
            self.force_logout();
            return true;
        }
        let Some(view) = self.detail.as_mut() else {
            return false;
        };
        view.loading = false;
        match result {
            Ok(detail) => {
                view.form = Some(detail.clone());
                view.detail = Some(detail);
                view.error = None;
                if view.edit_on_load {
                    view.edit_on_load = false;
                    view.editing = true;
                }
            }
            Err(err) => {
                tracing::warn!("detail load for {} failed: {}", view.incident_id, err);
                view.error = Some(err.user_message());
            }
        }
        true
    }

    pub fn start_edit(&mut self) {
        if let Some(view) = self.detail.as_mut() {
            if view.detail.is_some() {
                view.editing = true;
                view.confirm_hide = false;
                view.field = EditField::Title;
            }
        }
    }

    /// Drops unsaved changes.
    pub fn cancel_edit(&mut self) {
        if let Some(view) = self.detail.as_mut() {
            view.form = view.detail.clone();
            view.editing = false;
        }
    }

    pub fn next_edit_field(&mut self) {
        if let Some(view) = self.detail.as_mut() {
            view.field = view.field.next();
        }
    }

    pub fn edit_input(&mut self, c: char) {
        let Some(view) = self.detail.as_mut() else {
            return;
        };
        if !view.editing {
            return;
        }
        let field = view.field;
        let Some(form) = view.form.as_mut() else {
            return;
        };
        match field {
            EditField::Severity => {
                if c == ' ' {
                    form.incident.severity = next_severity(form.incident.severity);
                }
            }
            _ => {
                if let Some(text) = text_field(form, field) {
                    text.push(c);
                }
            }
        }
    }

    pub fn edit_backspace(&mut self) {
        let Some(view) = self.detail.as_mut() else {
            return;
        };
        if !view.editing {
            return;
        }
        let field = view.field;
        if let Some(text) = view.form.as_mut().and_then(|f| text_field(f, field)) {
            text.pop();
        }
    }

    /// Newline in the long text fields, next field elsewhere.
    pub fn edit_enter(&mut self) {
        let multiline = self
            .detail
            .as_ref()
            .map(|v| v.editing && v.field.multiline())
            .unwrap_or(false);
        if multiline {
            self.edit_input('\n');
        } else {
            self.next_edit_field();
        }
    }

    pub fn save(&mut self) -> Action {
        let generation = self.view_generation;
        let Some(view) = self.detail.as_mut() else {
            return Action::None;
        };
        if !view.editing || view.saving {
            return Action::None;
        }
        let (Some(detail), Some(form)) = (&view.detail, &view.form) else {
            return Action::None;
        };
        let update = IncidentUpdate::diff(detail, form);
        if update.is_empty() {
            view.editing = false;
            self.notice = Some("No changes to save.".into());
            return Action::None;
        }
        view.saving = true;
        Action::Save {
            generation,
            id: view.incident_id.clone(),
            update,
        }
    }

    /// On failure the form stays open with the user's edits intact.
    pub fn save_result(
        &mut self,
        generation: u64,
        update: &IncidentUpdate,
        result: Result<(), ConsoleError>,
    ) -> bool {
        if generation != self.view_generation {
            return false;
        }
        if matches!(result, Err(ConsoleError::Unauthorized)) {
            self.force_logout();
            return true;
        }
        let Some(view) = self.detail.as_mut() else {
            return false;
        };
        view.saving = false;
        match result {
            Ok(()) => {
                if let Some(detail) = view.detail.as_mut() {
                    detail.merge(update);
                    let merged = detail.incident.clone();
                    if let Some(row) = self
                        .incidents
                        .iter_mut()
                        .find(|i| i.incident_id == merged.incident_id)
                    {
                        row.alarm_title = merged.alarm_title;
                        row.severity = merged.severity;
                    }
                }
                view.form = view.detail.clone();
                view.editing = false;
                self.notice = Some("Saved successfully.".into());
            }
            Err(err) => {
                tracing::warn!("save of {} failed: {}", view.incident_id, err);
                self.notice = Some(err.user_message());
            }
        }
        true
    }

    pub fn request_hide(&mut self) {
        if let Some(view) = self.detail.as_mut() {
            if !view.editing && view.detail.is_some() {
                view.confirm_hide = true;
            }
        }
    }

    pub fn answer_hide(&mut self, confirmed: bool) -> Action {
        let generation = self.view_generation;
        let Some(view) = self.detail.as_mut() else {
            return Action::None;
        };
        if !view.confirm_hide {
            return Action::None;
        }
        view.confirm_hide = false;
        if !confirmed {
            return Action::None;
        }
        Action::Hide {
            generation,
            id: view.incident_id.clone(),
        }
    }

    pub fn hide_result(&mut self, generation: u64, id: &str, result: Result<(), ConsoleError>) -> bool {
        if generation != self.view_generation {
            return false;
        }
        match result {
            Ok(()) => {
                self.incidents.retain(|i| i.incident_id != id);
                self.back_to_list();
                self.notice = Some(format!("{} hidden from the list.", id));
                self.log(format!("[DATA] {} hidden", id));
            }
            Err(ConsoleError::Unauthorized) => self.force_logout(),
            Err(err) => {
                tracing::warn!("hide of {} failed: {}", id, err);
                self.notice = Some("Hiding failed. Please try again.".into());
            }
        }
        true
    }

    pub fn scroll_detail(&mut self, down: bool) {
        if let Some(view) = self.detail.as_mut() {
            view.scroll = if down {
                view.scroll.saturating_add(1)
            } else {
                view.scroll.saturating_sub(1)
            };
        }
    }

    // ── misc ────────────────────────────────────────────────────────────

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn auth_input(&mut self, c: char) {
        match self.auth.field {
            AuthField::Id => self.auth.id.push(c),
            AuthField::Password => self.auth.password.push(c),
        }
    }

    pub fn auth_backspace(&mut self) {
        match self.auth.field {
            AuthField::Id => self.auth.id.pop(),
            AuthField::Password => self.auth.password.pop(),
        };
    }
}

fn text_field(form: &mut IncidentDetail, field: EditField) -> Option<&mut String> {
    match field {
        EditField::Title => Some(&mut form.incident.alarm_title),
        EditField::Status => Some(&mut form.status),
        EditField::Summary => Some(&mut form.analysis_summary),
        EditField::Detail => Some(&mut form.analysis_detail),
        EditField::Severity => None,
    }
}

fn next_severity(sev: Severity) -> Severity {
    match sev {
        Severity::Info => Severity::Warning,
        Severity::Warning => Severity::Critical,
        Severity::Critical => Severity::Info,
    }
}
