//! Event handling for [`App`].
//!
//! Every handler mutates state synchronously and returns the [`Command`]s
//! the event loop should run in the background.

use crate::controller::{
    describe_error, ActionError, GridLoad, MutationKind, MutationOutcome, PageLoad,
};
use crate::events::TuiEvent;
use crate::keys::{map_confirm_key, map_key, map_text_key, Action, TextAction};
use crate::nav::View;
use crate::notifications::{Notification, NotificationAction, NotificationLevel};
use crate::state::{App, ConfirmDelete, FormState, InputMode, Modal, RowRequest};
use crate::tasks::Command;
use aptime_core::{
    validate_form, EntityKind, FormErrors, GridError, Identity, RemoteResult, LABEL_FIELD,
};
use chrono::Utc;
use crossterm::event::{KeyEvent, KeyEventKind};

pub const HELP_TEXT: &str = "\
Tab / Shift-Tab  switch view        1-9, 0  jump to view
j / k            move selection     h / l   previous / next page
/                search             Esc     clear search
n                new record         e       edit selected
d                delete selected    v       open timetable grid
c / r / x        grid: course, room, clear cell
p                change password    L       log out
Ctrl-r           reload             q       quit";

impl App {
    pub fn handle_event(&mut self, event: TuiEvent) -> Vec<Command> {
        match event {
            TuiEvent::Input(key) => self.handle_key(key),
            TuiEvent::Tick => {
                self.expire_notifications(Utc::now());
                Vec::new()
            }
            TuiEvent::Resize { width, height } => {
                tracing::trace!(width, height, "resize");
                Vec::new()
            }
            TuiEvent::PageLoaded { generation, load } => self.apply_page_load(generation, *load),
            TuiEvent::MutationDone { kind, op, result } => self.apply_mutation(kind, op, result),
            TuiEvent::SignedIn(result) => self.apply_sign_in(result),
            TuiEvent::PasswordChanged(result) => self.apply_password_change(result),
            TuiEvent::GridLoaded { generation, result } => self.apply_grid_load(generation, *result),
            TuiEvent::ApiError(message) => {
                self.notify(NotificationLevel::Error, message);
                Vec::new()
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match self.input_mode() {
            InputMode::Help => {
                self.modal = None;
                Vec::new()
            }
            InputMode::Confirm => match map_confirm_key(key) {
                Some(true) => self.confirm_delete(),
                Some(false) => {
                    self.confirm = None;
                    Vec::new()
                }
                None => Vec::new(),
            },
            InputMode::Normal => map_key(key)
                .map(|action| self.handle_action(action))
                .unwrap_or_default(),
            InputMode::Search | InputMode::Form | InputMode::Login | InputMode::Password => {
                map_text_key(key)
                    .map(|action| self.handle_text(action))
                    .unwrap_or_default()
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Command> {
        let on_grid = self.active_view == View::TimetableGrid;
        match action {
            Action::Quit => return vec![Command::Quit],
            Action::NextView => return self.activate_view(self.active_view.next()),
            Action::PrevView => return self.activate_view(self.active_view.previous()),
            Action::SwitchView(index) => {
                if let Some(view) = View::from_index(index) {
                    return self.activate_view(view);
                }
            }
            Action::ChangePassword => return self.activate_view(View::ChangePassword),
            Action::Refresh => return self.reload(),
            Action::Logout => self.logout(),
            Action::OpenHelp => {
                self.modal = Some(Modal {
                    title: "Keybindings".to_string(),
                    message: HELP_TEXT.to_string(),
                })
            }
            Action::MoveUp if on_grid => self.grid.move_day(false),
            Action::MoveDown if on_grid => self.grid.move_day(true),
            Action::MoveLeft if on_grid => self.grid.move_slot(false),
            Action::MoveRight if on_grid => self.grid.move_slot(true),
            Action::CycleCourse if on_grid => {
                let result = self.grid.cycle_course();
                self.report_grid(result);
            }
            Action::CycleRoom if on_grid => {
                let result = self.grid.cycle_room();
                self.report_grid(result);
            }
            Action::ClearCell if on_grid => {
                let result = self.grid.clear_cell();
                self.report_grid(result);
            }
            Action::MoveUp => self.with_page(|page| page.select_previous()),
            Action::MoveDown => self.with_page(|page| page.select_next()),
            Action::MoveLeft => self.with_page(|page| page.previous_page()),
            Action::MoveRight => self.with_page(|page| page.next_page()),
            Action::OpenSearch => self.with_page(|page| page.search_editing = true),
            Action::Cancel => self.with_page(|page| page.set_search("")),
            Action::NewItem => {
                if let Some(kind) = self.active_view.entity() {
                    self.form = Some(FormState::create(kind));
                }
            }
            Action::EditItem | Action::Confirm => self.edit_selected(),
            Action::DeleteItem => self.delete_selected(),
            Action::OpenGrid => return self.open_grid(),
            Action::CycleCourse | Action::CycleRoom | Action::ClearCell => {}
        }
        Vec::new()
    }

    fn with_page(&mut self, f: impl FnOnce(&mut crate::state::PageState)) {
        if let Some(page) = self.active_page_mut() {
            f(page);
        }
    }

    fn report_grid(&mut self, result: Result<(), GridError>) {
        if let Err(err) = result {
            self.notify(NotificationLevel::Warning, err.to_string());
        }
    }

    pub fn handle_text(&mut self, action: TextAction) -> Vec<Command> {
        if action == TextAction::Quit {
            return vec![Command::Quit];
        }
        match self.input_mode() {
            InputMode::Search => {
                self.handle_search_text(action);
                Vec::new()
            }
            InputMode::Form => self.handle_form_text(action),
            InputMode::Login => self.handle_login_text(action),
            InputMode::Password => self.handle_password_text(action),
            InputMode::Normal | InputMode::Confirm | InputMode::Help => Vec::new(),
        }
    }

    fn handle_search_text(&mut self, action: TextAction) {
        let Some(page) = self.active_page_mut() else { return };
        match action {
            TextAction::Insert(c) => page.push_search_char(c),
            TextAction::Backspace => page.pop_search_char(),
            TextAction::ClearField => page.set_search(""),
            TextAction::Submit => page.search_editing = false,
            TextAction::Cancel => {
                page.set_search("");
                page.search_editing = false;
            }
            _ => {}
        }
    }

    fn handle_form_text(&mut self, action: TextAction) -> Vec<Command> {
        if action == TextAction::Submit {
            return self.submit_form();
        }
        let Some(form) = self.form.as_mut() else { return Vec::new() };
        match action {
            TextAction::Insert(c) => form.insert_char(c),
            TextAction::Backspace => form.backspace(),
            TextAction::ClearField => form.clear_field(),
            TextAction::NextField => form.next_field(),
            TextAction::PrevField => form.previous_field(),
            TextAction::CycleNext | TextAction::CyclePrev => {
                if let Some(page) = self.pages.get(&form.kind) {
                    form.cycle_option(&page.references, action == TextAction::CycleNext);
                }
            }
            TextAction::Cancel => self.form = None,
            TextAction::Submit | TextAction::Quit => {}
        }
        Vec::new()
    }

    /// Validate locally, then hand the payload to the background.
    fn submit_form(&mut self) -> Vec<Command> {
        let Some(form) = self.form.as_mut() else { return Vec::new() };
        if form.submitting {
            return Vec::new();
        }
        let Some(page) = self.pages.get(&form.kind) else { return Vec::new() };
        let payload = form.to_record();
        match validate_form(form.kind.schema(), &payload, page.store.records(), &page.references) {
            Ok(()) => {
                form.errors = FormErrors::new();
                form.submitting = true;
                vec![Command::Submit {
                    kind: form.kind,
                    payload,
                    editing: form.editing.clone(),
                }]
            }
            Err(errors) => {
                tracing::debug!(kind = form.kind.resource(), errors = %errors, "form rejected");
                form.errors = errors;
                self.notify(NotificationLevel::Warning, "Please correct the highlighted fields.");
                Vec::new()
            }
        }
    }

    fn handle_login_text(&mut self, action: TextAction) -> Vec<Command> {
        let login = &mut self.login;
        match action {
            TextAction::Insert(c) => login.insert_char(c),
            TextAction::Backspace => login.backspace(),
            TextAction::ClearField => login.clear_field(),
            TextAction::NextField | TextAction::CycleNext => login.cycle_focus(true),
            TextAction::PrevField | TextAction::CyclePrev => login.cycle_focus(false),
            TextAction::Cancel => {
                login.password.clear();
                login.errors.clear();
            }
            TextAction::Submit => {
                if login.submitting {
                    return Vec::new();
                }
                let form = login.form();
                return match form.validate() {
                    Ok(()) => {
                        login.errors.clear();
                        login.submitting = true;
                        vec![Command::Login(form)]
                    }
                    Err(errors) => {
                        login.errors = errors.messages().to_vec();
                        Vec::new()
                    }
                };
            }
            TextAction::Quit => {}
        }
        Vec::new()
    }

    fn handle_password_text(&mut self, action: TextAction) -> Vec<Command> {
        match action {
            TextAction::Insert(c) => self.password.insert_char(c),
            TextAction::Backspace => self.password.backspace(),
            TextAction::ClearField => self.password.clear_field(),
            TextAction::NextField | TextAction::CycleNext => self.password.cycle_focus(true),
            TextAction::PrevField | TextAction::CyclePrev => self.password.cycle_focus(false),
            TextAction::Cancel => return self.activate_view(self.last_view),
            TextAction::Submit => return self.submit_password(),
            TextAction::Quit => {}
        }
        Vec::new()
    }

    fn submit_password(&mut self) -> Vec<Command> {
        if self.password.submitting {
            return Vec::new();
        }
        let identity = match self.session.guard() {
            Ok(identity) => identity.clone(),
            Err(err) => {
                self.require_sign_in(View::ChangePassword, err.to_string());
                return Vec::new();
            }
        };
        let change = self.password.change();
        match change.validate() {
            Ok(()) => {
                self.password.errors.clear();
                self.password.submitting = true;
                vec![Command::ChangePassword { change, identity }]
            }
            Err(errors) => {
                self.password.errors = errors.messages().to_vec();
                Vec::new()
            }
        }
    }

    /// Switch views, enforcing the session role and starting any load the
    /// target needs.
    pub fn activate_view(&mut self, view: View) -> Vec<Command> {
        if view.requires_session() {
            if let Err(err) = self.session.guard() {
                self.require_sign_in(view, err.to_string());
                return Vec::new();
            }
        }

        if self.active_view != view {
            if let Some(page) = self.active_page_mut() {
                page.invalidate();
            }
            if self.active_view == View::TimetableGrid && self.grid.loading {
                self.grid.invalidate();
            }
            if self.active_view != View::ChangePassword && self.active_view != View::Login {
                self.last_view = self.active_view;
            }
        }
        self.active_view = view;
        tracing::debug!(view = view.title(), "view activated");

        match view {
            View::TimetableGrid => {
                if self.grid.needs_load() {
                    return self.start_grid_load();
                }
                if self.grid.tid.is_none() {
                    self.notify(
                        NotificationLevel::Info,
                        "Pick a timetable in the Timetables view and press v to open its grid.",
                    );
                }
                Vec::new()
            }
            View::ChangePassword => {
                self.password = Default::default();
                Vec::new()
            }
            View::Login => Vec::new(),
            other => match other.entity() {
                Some(kind) => self.start_page_load(kind),
                None => Vec::new(),
            },
        }
    }

    fn require_sign_in(&mut self, target: View, reason: String) {
        if self.session.is_signed_in() {
            self.session.sign_out();
        }
        if target != View::Login {
            self.return_view = target;
        }
        self.active_view = View::Login;
        self.push_notification(
            Notification::new(NotificationLevel::Warning, format!("Access denied: {}", reason))
                .with_action(NotificationAction::SignIn),
        );
    }

    fn start_page_load(&mut self, kind: EntityKind) -> Vec<Command> {
        match self.pages.get_mut(&kind) {
            Some(page) => {
                let generation = page.begin_load();
                vec![Command::LoadPage { kind, generation }]
            }
            None => Vec::new(),
        }
    }

    fn start_grid_load(&mut self) -> Vec<Command> {
        match self.grid.tid.clone() {
            Some(tid) => {
                let generation = self.grid.begin_load();
                vec![Command::LoadGrid { tid, generation }]
            }
            None => Vec::new(),
        }
    }

    pub fn reload(&mut self) -> Vec<Command> {
        match self.active_view {
            View::TimetableGrid if self.grid.tid.is_some() => {
                let tid = self.grid.tid.clone();
                if let Some(tid) = tid {
                    self.grid.select(tid);
                }
                self.start_grid_load()
            }
            view => match view.entity() {
                Some(kind) => self.start_page_load(kind),
                None => Vec::new(),
            },
        }
    }

    pub fn logout(&mut self) {
        self.session.sign_out();
        for page in self.pages.values_mut() {
            page.reset();
        }
        self.grid.reset();
        self.form = None;
        self.confirm = None;
        self.password = Default::default();
        self.login.password.clear();
        self.login.errors.clear();
        self.login.submitting = false;
        self.login.focus = 1;
        if self.active_view != View::Login {
            self.return_view = self.active_view;
        }
        self.active_view = View::Login;
        self.notify(NotificationLevel::Info, "Logged out.");
    }

    fn edit_selected(&mut self) {
        let Some(kind) = self.active_view.entity() else { return };
        let Some(page) = self.pages.get(&kind) else { return };
        let Some(row) = page.selected_row() else {
            self.notify(NotificationLevel::Info, "No record selected.");
            return;
        };
        let mut request = RowRequest::default();
        page.table.request_edit(row, &mut request);
        let Some(row) = request.edit else { return };
        match page.table.resolve_identity(&row) {
            Ok(id) => {
                let record = page.store.find(&id).cloned().unwrap_or(row);
                self.form = Some(FormState::edit(kind, &record, id));
            }
            Err(err) => self.notify(NotificationLevel::Warning, err.to_string()),
        }
    }

    fn delete_selected(&mut self) {
        let Some(kind) = self.active_view.entity() else { return };
        let Some(page) = self.pages.get(&kind) else { return };
        let Some(row) = page.selected_row() else {
            self.notify(NotificationLevel::Info, "No record selected.");
            return;
        };
        let mut request = RowRequest::default();
        match page.table.request_delete(row, &mut request) {
            Ok(_) => {
                if let Some(id) = request.delete {
                    let name = row.text(LABEL_FIELD);
                    let label = if name.trim().is_empty() { id.to_string() } else { name };
                    self.confirm = Some(ConfirmDelete { kind, id, label });
                }
            }
            Err(err) => {
                tracing::warn!(kind = kind.resource(), error = %err, "delete without identity");
                self.notify(NotificationLevel::Warning, err.to_string());
            }
        }
    }

    fn confirm_delete(&mut self) -> Vec<Command> {
        match self.confirm.take() {
            Some(ConfirmDelete { kind, id, .. }) => vec![Command::Delete { kind, id }],
            None => Vec::new(),
        }
    }

    fn open_grid(&mut self) -> Vec<Command> {
        if self.active_view != View::Timetables {
            return Vec::new();
        }
        let Some(page) = self.active_page() else { return Vec::new() };
        let Some(row) = page.selected_row() else {
            self.notify(NotificationLevel::Info, "No timetable selected.");
            return Vec::new();
        };
        match page.table.resolve_identity(row) {
            Ok(tid) => {
                self.grid.select(tid);
                self.activate_view(View::TimetableGrid)
            }
            Err(err) => {
                self.notify(NotificationLevel::Warning, err.to_string());
                Vec::new()
            }
        }
    }

    fn apply_page_load(&mut self, generation: u64, load: PageLoad) -> Vec<Command> {
        let notices = match self.pages.get_mut(&load.kind) {
            Some(page) => page.apply_load(generation, load),
            None => None,
        };
        for notice in notices.unwrap_or_default() {
            self.push_notification(notice);
        }
        Vec::new()
    }

    fn apply_mutation(
        &mut self,
        kind: EntityKind,
        op: MutationKind,
        result: RemoteResult<MutationOutcome>,
    ) -> Vec<Command> {
        let form_pending = self
            .form
            .as_ref()
            .map_or(false, |form| form.kind == kind && form.submitting);
        match result {
            Ok(outcome) => {
                let verb = match &outcome.mutation {
                    crate::controller::Mutation::Created { .. } => "added",
                    crate::controller::Mutation::Updated { .. } => "updated",
                    crate::controller::Mutation::Deleted { .. } => "deleted",
                };
                if let Some(page) = self.pages.get_mut(&kind) {
                    page.apply_mutation(outcome.mutation, Utc::now().timestamp_millis());
                }
                if form_pending {
                    self.form = None;
                }
                self.notify(
                    NotificationLevel::Success,
                    format!("{} {} successfully!", kind.noun(), verb),
                );
            }
            Err(err) => {
                if form_pending {
                    if let Some(form) = self.form.as_mut() {
                        form.submitting = false;
                    }
                }
                let context = op.failure_context(kind.noun());
                self.notify(NotificationLevel::Error, describe_error(&context, &err));
            }
        }
        Vec::new()
    }

    fn apply_sign_in(&mut self, result: Result<Identity, ActionError>) -> Vec<Command> {
        self.login.submitting = false;
        match result {
            Ok(identity) => {
                self.session.sign_in(identity);
                if let Err(err) = self.session.guard() {
                    self.session.sign_out();
                    self.notify(NotificationLevel::Error, format!("Access denied: {}", err));
                    return Vec::new();
                }
                self.login.password.clear();
                self.login.errors.clear();
                self.notify(NotificationLevel::Success, "Login successful!");
                let target = self.return_view;
                self.activate_view(target)
            }
            Err(err) => {
                let message = match &err {
                    ActionError::Remote(remote) => describe_error("Login failed", remote),
                    other => format!("Login failed: {}", other),
                };
                self.notify(NotificationLevel::Error, message);
                Vec::new()
            }
        }
    }

    fn apply_password_change(&mut self, result: RemoteResult<String>) -> Vec<Command> {
        self.password.submitting = false;
        match result {
            Ok(message) => {
                self.logout();
                self.return_view = View::Shifts;
                self.notify(
                    NotificationLevel::Success,
                    format!("{} Please sign in again.", message),
                );
            }
            Err(err) => {
                self.notify(
                    NotificationLevel::Error,
                    describe_error("Failed to change password", &err),
                );
            }
        }
        Vec::new()
    }

    fn apply_grid_load(
        &mut self,
        generation: u64,
        result: Result<GridLoad, ActionError>,
    ) -> Vec<Command> {
        match result {
            Ok(load) => {
                for notice in self.grid.apply_load(generation, load).unwrap_or_default() {
                    self.push_notification(notice);
                }
            }
            Err(err) => {
                if !self.grid.fail_load(generation) {
                    tracing::debug!(generation, "dropping stale grid failure");
                    return Vec::new();
                }
                let message = match &err {
                    ActionError::Remote(remote) => describe_error("Failed to load timetable", remote),
                    other => format!("Failed to load timetable: {}", other),
                };
                self.push_notification(
                    Notification::new(NotificationLevel::Error, message)
                        .with_action(NotificationAction::Reload),
                );
            }
        }
        Vec::new()
    }
}
