//! Application state and view state definitions.

use crate::config::TuiConfig;
use crate::controller::{describe_error, GridLoad, Mutation, PageLoad};
use crate::error::TuiError;
use crate::nav::View;
use crate::notifications::{Notification, NotificationAction, NotificationLevel};
use crate::persistence::PersistedState;
use crate::session::Session;
use crate::theme::SynthBruteTheme;
use aptime_core::{
    enrich, EntityKind, FormErrors, FormField, LoginForm, PasswordChange, Record, RecordId,
    RecordStore, ReferenceSet, Rule, RowActions, TableError, TableView, TimetableGrid,
    TimetableSummary, GridError, LABEL_FIELD,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// Oldest notifications are dropped beyond this many.
const NOTIFICATION_LIMIT: usize = 50;

/// What the keyboard is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Confirm,
    Login,
    Password,
    Help,
}

#[derive(Debug, Clone)]
pub struct Modal {
    pub title: String,
    pub message: String,
}

/// Pending delete awaiting a yes/no answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDelete {
    pub kind: EntityKind,
    pub id: RecordId,
    pub label: String,
}

/// Row actions captured from the table.
#[derive(Debug, Default)]
pub struct RowRequest {
    pub edit: Option<Record>,
    pub delete: Option<RecordId>,
}

impl RowActions<Record> for RowRequest {
    fn on_edit(&mut self, row: &Record) {
        self.edit = Some(row.clone());
    }

    fn on_delete(&mut self, id: RecordId) {
        self.delete = Some(id);
    }
}

/// One entity page: its store, reference lists and table.
#[derive(Debug, Clone)]
pub struct PageState {
    pub kind: EntityKind,
    pub store: RecordStore,
    pub references: ReferenceSet,
    pub table: TableView,
    /// Enriched copy of the store, the list the table is fed.
    rows: Vec<Record>,
    pub selected: usize,
    pub loading: bool,
    pub loaded: bool,
    pub search_editing: bool,
    generation: u64,
}

impl PageState {
    pub fn new(kind: EntityKind) -> Result<Self, TableError> {
        let schema = kind.schema();
        let table = TableView::new(schema.columns, schema.id_field, schema.items_per_page)?
            .with_search_fields(schema.search_fields);
        Ok(Self {
            kind,
            store: RecordStore::new(schema.id_field),
            references: ReferenceSet::new(),
            table,
            rows: Vec::new(),
            selected: 0,
            loading: false,
            loaded: false,
            search_editing: false,
            generation: 0,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a load and return the generation its result must carry.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Forget any load in flight.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.search_editing = false;
    }

    /// Drop all data, e.g. on sign-out.
    pub fn reset(&mut self) {
        self.invalidate();
        self.store.replace_all(Vec::new());
        self.references = ReferenceSet::new();
        self.table.set_search_term("");
        self.rows.clear();
        self.selected = 0;
        self.loaded = false;
    }

    /// Apply a load result. `None` when it belongs to a superseded load.
    pub fn apply_load(&mut self, generation: u64, load: PageLoad) -> Option<Vec<Notification>> {
        if generation != self.generation || !self.loading {
            tracing::debug!(
                kind = self.kind.resource(),
                generation,
                current = self.generation,
                "dropping stale page load"
            );
            return None;
        }
        self.loading = false;
        self.loaded = true;

        let mut notices = Vec::new();
        match load.primary {
            Ok(records) => self.store.replace_all(records),
            Err(err) => {
                let context = format!("Failed to fetch {}", self.kind.title());
                notices.push(
                    Notification::new(NotificationLevel::Error, describe_error(&context, &err))
                        .with_action(NotificationAction::Reload),
                );
            }
        }
        for (kind, result) in load.references {
            match result {
                Ok(records) => self.references.insert(kind, records),
                Err(err) => {
                    let context = format!("Failed to load {}", kind.title());
                    notices.push(
                        Notification::new(NotificationLevel::Warning, describe_error(&context, &err))
                            .with_action(NotificationAction::Reload),
                    );
                }
            }
        }
        self.refresh();
        Some(notices)
    }

    /// Patch the store after a successful mutation.
    pub fn apply_mutation(&mut self, mutation: Mutation, now_ms: i64) {
        match mutation {
            Mutation::Created { submitted, returned } => {
                let id = self.store.apply_created(submitted, returned, now_ms);
                tracing::debug!(kind = self.kind.resource(), id = %id, "appended record");
            }
            Mutation::Updated { id, record } => {
                if !self.store.apply_updated(&id, record) {
                    tracing::warn!(kind = self.kind.resource(), id = %id, "updated record not in list");
                }
            }
            Mutation::Deleted { id } => {
                self.store.remove(&id);
            }
        }
        self.refresh();
    }

    /// Recompute the enriched rows and pull paging back into range.
    pub fn refresh(&mut self) {
        self.rows = enrich(self.store.records(), self.kind.schema(), &self.references);
        self.table.clamp(&self.rows);
        self.clamp_selection();
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn visible(&self) -> Vec<&Record> {
        self.table.page_slice(&self.rows)
    }

    pub fn filtered_len(&self) -> usize {
        self.table.filtered_len(&self.rows)
    }

    pub fn selected_row(&self) -> Option<&Record> {
        self.visible().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_previous(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
        }
    }

    pub fn next_page(&mut self) {
        self.table.next_page(&self.rows);
        self.selected = 0;
    }

    pub fn previous_page(&mut self) {
        self.table.previous_page();
        self.selected = 0;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        if self.table.set_search_term(term) {
            self.selected = 0;
        }
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut term = self.table.search_term().to_string();
        term.push(c);
        self.set_search(term);
    }

    pub fn pop_search_char(&mut self) {
        let mut term = self.table.search_term().to_string();
        term.pop();
        self.set_search(term);
    }
}

/// Modal entry form for one entity kind.
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: EntityKind,
    /// Record being edited; `None` for a new record.
    pub editing: Option<RecordId>,
    pub values: Vec<String>,
    pub focus: usize,
    pub errors: FormErrors,
    pub submitting: bool,
}

impl FormState {
    pub fn create(kind: EntityKind) -> Self {
        let values = kind
            .schema()
            .form
            .iter()
            .map(|f| f.default.unwrap_or_default().to_string())
            .collect();
        Self {
            kind,
            editing: None,
            values,
            focus: 0,
            errors: FormErrors::new(),
            submitting: false,
        }
    }

    pub fn edit(kind: EntityKind, record: &Record, id: RecordId) -> Self {
        let values = kind
            .schema()
            .form
            .iter()
            .map(|f| record.get(f.field).normalized())
            .collect();
        Self {
            kind,
            editing: Some(id),
            values,
            focus: 0,
            errors: FormErrors::new(),
            submitting: false,
        }
    }

    pub fn title(&self) -> String {
        let verb = if self.editing.is_some() { "Edit" } else { "Add" };
        format!("{} {}", verb, self.kind.noun())
    }

    pub fn fields(&self) -> &'static [FormField] {
        self.kind.schema().form
    }

    pub fn focused_field(&self) -> Option<&'static FormField> {
        self.fields().get(self.focus)
    }

    pub fn value(&self, field: &str) -> &str {
        self.fields()
            .iter()
            .position(|f| f.field == field)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focused_field() {
            Some(field) if field.reference.is_none() => self.values.get_mut(self.focus),
            _ => None,
        }
    }

    /// Typing only reaches free-text fields; selectors are cycled.
    pub fn insert_char(&mut self, c: char) {
        if let Some(value) = self.focused_text() {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.focused_text() {
            value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.clear();
        }
    }

    pub fn next_field(&mut self) {
        let len = self.values.len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn previous_field(&mut self) {
        let len = self.values.len();
        if len > 0 {
            self.focus = if self.focus == 0 { len - 1 } else { self.focus - 1 };
        }
    }

    /// Step a selector through the loaded options of its reference kind.
    pub fn cycle_option(&mut self, refs: &ReferenceSet, forward: bool) {
        let Some(kind) = self.focused_field().and_then(|f| f.reference) else {
            return;
        };
        let options = refs.options(kind);
        if options.is_empty() {
            return;
        }
        let Some(value) = self.values.get_mut(self.focus) else {
            return;
        };
        let current = options.iter().position(|(id, _)| id == value.trim());
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => if i == 0 { options.len() - 1 } else { i - 1 },
        };
        *value = options[next].0.clone();
    }

    /// Label shown for a field value; selectors show the referenced name.
    pub fn display_value(&self, index: usize, refs: &ReferenceSet) -> String {
        let value = self.values.get(index).map(String::as_str).unwrap_or_default();
        match self.fields().get(index).and_then(|f| f.reference) {
            Some(kind) if !value.trim().is_empty() => refs
                .label(kind, value.trim())
                .unwrap_or_else(|| format!("#{}", value.trim())),
            Some(_) => "(none)".to_string(),
            None => value.to_string(),
        }
    }

    /// Submission payload. Ids and numeric fields are sent as numbers when
    /// they parse; the edited record's id is included.
    pub fn to_record(&self) -> Record {
        let schema = self.kind.schema();
        let mut record = Record::new();
        for (field, value) in schema.form.iter().zip(&self.values) {
            let value = value.trim();
            let numeric = field.reference.is_some()
                || schema.rules.iter().any(|r| {
                    r.field == field.field && matches!(r.rule, Rule::Numeric | Rule::PositiveNumber)
                });
            record.set(field.field, form_value(value, numeric));
        }
        if let Some(id) = &self.editing {
            record.set(id.field().name(), id.to_json());
        }
        record
    }
}

fn form_value(value: &str, numeric: bool) -> Value {
    if numeric {
        if let Ok(n) = value.parse::<i64>() {
            return Value::from(n);
        }
        if let Some(n) = value.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::from(value)
}

/// Focus-cycling text inputs shared by the login and password forms.
fn cycle_focus(focus: &mut usize, len: usize, forward: bool) {
    *focus = if forward {
        (*focus + 1) % len
    } else if *focus == 0 {
        len - 1
    } else {
        *focus - 1
    };
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    /// 0 is the username, 1 the password.
    pub focus: usize,
    pub errors: Vec<String>,
    pub submitting: bool,
}

impl LoginState {
    fn focused(&mut self) -> &mut String {
        if self.focus == 0 {
            &mut self.username
        } else {
            &mut self.password
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.focused().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused().pop();
    }

    pub fn clear_field(&mut self) {
        self.focused().clear();
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        cycle_focus(&mut self.focus, 2, forward);
    }

    pub fn form(&self) -> LoginForm {
        LoginForm {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordState {
    pub current: String,
    pub new: String,
    pub confirm: String,
    pub focus: usize,
    pub errors: Vec<String>,
    pub submitting: bool,
}

impl PasswordState {
    fn focused(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.current,
            1 => &mut self.new,
            _ => &mut self.confirm,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.focused().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused().pop();
    }

    pub fn clear_field(&mut self) {
        self.focused().clear();
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        cycle_focus(&mut self.focus, 3, forward);
    }

    pub fn change(&self) -> PasswordChange {
        PasswordChange {
            current: self.current.clone(),
            new: self.new.clone(),
            confirm: self.confirm.clone(),
        }
    }
}

/// Timetable grid view: summary, offerings, rooms and a cell cursor.
#[derive(Debug, Clone, Default)]
pub struct GridState {
    pub tid: Option<RecordId>,
    pub loading: bool,
    pub summary: Option<TimetableSummary>,
    pub grid: Option<TimetableGrid>,
    pub offerings: Vec<Record>,
    pub rooms: Vec<Record>,
    pub day: usize,
    pub slot: usize,
    generation: u64,
}

impl GridState {
    /// Point the view at another timetable, dropping the old grid.
    pub fn select(&mut self, tid: RecordId) {
        let generation = self.generation + 1;
        *self = GridState {
            tid: Some(tid),
            generation,
            ..GridState::default()
        };
    }

    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = GridState {
            generation,
            ..GridState::default()
        };
    }

    pub fn needs_load(&self) -> bool {
        self.tid.is_some() && self.grid.is_none() && !self.loading
    }

    /// Apply a grid load. `None` when it belongs to a superseded load.
    pub fn apply_load(&mut self, generation: u64, load: GridLoad) -> Option<Vec<Notification>> {
        if generation != self.generation || !self.loading {
            tracing::debug!(generation, current = self.generation, "dropping stale grid load");
            return None;
        }
        self.loading = false;
        let mut notices = Vec::new();
        let slots = load.summary.slots();
        if slots.is_empty() {
            notices.push(Notification::new(
                NotificationLevel::Warning,
                "This timetable has no time slots between its start and end time.",
            ));
        }
        match load.offerings {
            Ok(rows) => self.offerings = rows,
            Err(err) => notices.push(Notification::new(
                NotificationLevel::Error,
                describe_error("Failed to load courses", &err),
            )),
        }
        match load.rooms {
            Ok(rows) => self.rooms = rows,
            Err(err) => notices.push(Notification::new(
                NotificationLevel::Error,
                describe_error("Failed to load classrooms", &err),
            )),
        }
        self.grid = Some(TimetableGrid::new(slots));
        self.summary = Some(load.summary);
        self.tid = Some(load.tid);
        self.day = 0;
        self.slot = 0;
        Some(notices)
    }

    /// Mark a failed load as finished. `false` when it was stale.
    pub fn fail_load(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.loading {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn move_day(&mut self, forward: bool) {
        let Some(grid) = &self.grid else { return };
        let days = grid.days().len();
        self.day = step(self.day, days, forward);
    }

    pub fn move_slot(&mut self, forward: bool) {
        let Some(grid) = &self.grid else { return };
        let slots = grid.slots().len();
        self.slot = step(self.slot, slots, forward);
    }

    /// `(cid, course name)` pairs offered to this timetable, first occurrence wins.
    pub fn course_options(&self) -> Vec<(String, String)> {
        let mut options: Vec<(String, String)> = Vec::new();
        for offering in &self.offerings {
            let cid = offering.get("cid").normalized();
            if !cid.is_empty() && !options.iter().any(|(id, _)| *id == cid) {
                options.push((cid, offering.text("course_name")));
            }
        }
        options
    }

    pub fn room_options(&self) -> Vec<(String, String)> {
        self.rooms
            .iter()
            .filter_map(|room| {
                let rid = room.get("rid").normalized();
                (!rid.is_empty()).then(|| (rid, room.text(LABEL_FIELD)))
            })
            .collect()
    }

    pub fn course_label(&self, cid: &str) -> String {
        label_for(&self.course_options(), cid)
    }

    pub fn room_label(&self, rid: &str) -> String {
        label_for(&self.room_options(), rid)
    }

    /// Assign the next offered course to the cursor cell; past the last one clears it.
    pub fn cycle_course(&mut self) -> Result<(), GridError> {
        let options = self.course_options();
        let (day, slot) = (self.day, self.slot);
        let Some(grid) = self.grid.as_mut() else { return Ok(()) };
        let current = grid.cell(day, slot)?.course.clone();
        let next = next_choice(&options, current.as_deref());
        grid.assign_course(day, slot, next.as_deref(), &self.offerings)
    }

    pub fn cycle_room(&mut self) -> Result<(), GridError> {
        let options = self.room_options();
        let (day, slot) = (self.day, self.slot);
        let Some(grid) = self.grid.as_mut() else { return Ok(()) };
        let current = grid.cell(day, slot)?.room.clone();
        let next = next_choice(&options, current.as_deref());
        grid.assign_room(day, slot, next.as_deref())
    }

    pub fn clear_cell(&mut self) -> Result<(), GridError> {
        let (day, slot) = (self.day, self.slot);
        match self.grid.as_mut() {
            Some(grid) => grid.clear(day, slot),
            None => Ok(()),
        }
    }
}

fn step(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (current + 1).min(len - 1)
    } else {
        current.saturating_sub(1)
    }
}

fn label_for(options: &[(String, String)], key: &str) -> String {
    options
        .iter()
        .find(|(id, _)| id == key)
        .map(|(_, label)| label.clone())
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| format!("#{}", key))
}

/// None -> first -> ... -> last -> None.
fn next_choice(options: &[(String, String)], current: Option<&str>) -> Option<String> {
    let index = match current {
        None => 0,
        Some(key) => match options.iter().position(|(id, _)| id == key) {
            Some(i) => i + 1,
            None => 0,
        },
    };
    options.get(index).map(|(id, _)| id.clone())
}

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub session: Session,
    pub active_view: View,
    /// Where to go after signing in.
    pub return_view: View,
    /// Where Esc leaves the password screen to.
    pub last_view: View,
    pub pages: BTreeMap<EntityKind, PageState>,
    pub form: Option<FormState>,
    pub confirm: Option<ConfirmDelete>,
    pub modal: Option<Modal>,
    pub login: LoginState,
    pub password: PasswordState,
    pub grid: GridState,
    pub notifications: Vec<Notification>,
}

impl App {
    pub fn new(config: TuiConfig) -> Result<Self, TuiError> {
        let mut pages = BTreeMap::new();
        for kind in EntityKind::all() {
            pages.insert(*kind, PageState::new(*kind)?);
        }
        let session = Session::new(config.required_role.clone());
        Ok(Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            session,
            active_view: View::Login,
            return_view: View::Shifts,
            last_view: View::Shifts,
            pages,
            form: None,
            confirm: None,
            modal: None,
            login: LoginState::default(),
            password: PasswordState::default(),
            grid: GridState::default(),
            notifications: Vec::new(),
        })
    }

    /// Apply state saved by a previous run.
    pub fn restore(&mut self, state: PersistedState) {
        self.return_view = resumable(state.active_view);
        if let Some(username) = state.last_username {
            self.login.username = username;
            self.login.focus = 1;
        }
    }

    pub fn persisted_state(&self) -> PersistedState {
        let view = if self.active_view == View::Login {
            self.return_view
        } else {
            self.active_view
        };
        let username = self.login.username.trim();
        PersistedState {
            active_view: resumable(view),
            last_username: (!username.is_empty()).then(|| username.to_string()),
        }
    }

    pub fn input_mode(&self) -> InputMode {
        if self.modal.is_some() {
            InputMode::Help
        } else if self.confirm.is_some() {
            InputMode::Confirm
        } else if self.form.is_some() {
            InputMode::Form
        } else {
            match self.active_view {
                View::Login => InputMode::Login,
                View::ChangePassword => InputMode::Password,
                view => match view.entity().and_then(|kind| self.pages.get(&kind)) {
                    Some(page) if page.search_editing => InputMode::Search,
                    _ => InputMode::Normal,
                },
            }
        }
    }

    pub fn active_page(&self) -> Option<&PageState> {
        self.active_view.entity().and_then(|kind| self.pages.get(&kind))
    }

    pub fn active_page_mut(&mut self) -> Option<&mut PageState> {
        let kind = self.active_view.entity()?;
        self.pages.get_mut(&kind)
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.push_notification(Notification::new(level, message));
    }

    pub fn push_notification(&mut self, notification: Notification) {
        tracing::debug!(level = notification.level.label(), message = %notification.message, "notify");
        self.notifications.push(notification);
        if self.notifications.len() > NOTIFICATION_LIMIT {
            let excess = self.notifications.len() - NOTIFICATION_LIMIT;
            self.notifications.drain(..excess);
        }
    }

    /// Most recent notification still worth showing.
    pub fn current_notification(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.notifications.last().filter(|n| !n.is_expired(now))
    }

    pub fn expire_notifications(&mut self, now: DateTime<Utc>) {
        self.notifications.retain(|n| !n.is_expired(now));
    }
}

/// The grid needs a timetable picked first, so a restart resumes at the list.
fn resumable(view: View) -> View {
    match view {
        View::Login => View::Shifts,
        View::TimetableGrid => View::Timetables,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn departments() -> Vec<Record> {
        (1..=8)
            .map(|i| {
                Record::new()
                    .with("did", i)
                    .with("name", format!("Dept {}", i))
                    .with("alias", format!("D{}", i))
                    .with("timeid", 1)
            })
            .collect()
    }

    fn loaded_page() -> PageState {
        let mut page = PageState::new(EntityKind::Department).unwrap();
        let generation = page.begin_load();
        let load = PageLoad {
            kind: EntityKind::Department,
            primary: Ok(departments()),
            references: vec![(
                EntityKind::Shift,
                Ok(vec![Record::new().with("timeid", 1).with("name", "Morning")]),
            )],
        };
        page.apply_load(generation, load).unwrap();
        page
    }

    #[test]
    fn test_page_load_enriches_rows() {
        let page = loaded_page();
        assert!(page.loaded);
        assert!(!page.loading);
        assert_eq!(page.rows()[0].text("shiftName"), "Morning");
        assert_eq!(page.visible().len(), 6);
    }

    #[test]
    fn test_stale_page_load_is_dropped() {
        let mut page = PageState::new(EntityKind::Section).unwrap();
        let first = page.begin_load();
        let second = page.begin_load();
        let load = |name: &str| PageLoad {
            kind: EntityKind::Section,
            primary: Ok(vec![Record::new().with("sid", 1).with("name", name)]),
            references: Vec::new(),
        };
        assert!(page.apply_load(first, load("old")).is_none());
        assert!(page.loading);
        assert!(page.apply_load(second, load("new")).is_some());
        assert_eq!(page.rows()[0].text("name"), "new");
    }

    #[test]
    fn test_failed_reference_list_does_not_block_primary() {
        let mut page = PageState::new(EntityKind::Department).unwrap();
        let generation = page.begin_load();
        let load = PageLoad {
            kind: EntityKind::Department,
            primary: Ok(departments()),
            references: vec![(
                EntityKind::Shift,
                Err(aptime_core::RemoteError::Transport("timeout".into())),
            )],
        };
        let notices = page.apply_load(generation, load).unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NotificationLevel::Warning);
        assert_eq!(page.rows().len(), 8);
        assert_eq!(page.rows()[0].text("shiftName"), "Unknown Shift");
    }

    #[test]
    fn test_search_resets_selection_and_page() {
        let mut page = loaded_page();
        page.next_page();
        page.select_next();
        page.set_search("dept 7");
        assert_eq!(page.table.current_page(), 1);
        assert_eq!(page.selected, 0);
        assert_eq!(page.visible().len(), 1);
    }

    #[test]
    fn test_delete_clamps_page_after_shrink() {
        let mut page = loaded_page();
        page.next_page();
        assert_eq!(page.table.current_page(), 2);
        for did in [7, 8] {
            let id = RecordId::from_integer(EntityKind::Department.id_field(), did);
            page.apply_mutation(Mutation::Deleted { id }, 0);
        }
        assert_eq!(page.table.current_page(), 1);
        assert_eq!(page.rows().len(), 6);
    }

    #[test]
    fn test_form_defaults_and_payload() {
        let mut form = FormState::create(EntityKind::Shift);
        assert_eq!(form.value("gap"), "15");
        for c in "Morning".chars() {
            form.insert_char(c);
        }
        let record = form.to_record();
        assert_eq!(record.raw("name"), Some(&json!("Morning")));
        assert_eq!(record.raw("gap"), Some(&json!(15)));
        assert!(!record.contains("timeid"));
    }

    #[test]
    fn test_form_selector_cycles_reference_options() {
        let refs = ReferenceSet::new().with(
            EntityKind::Shift,
            vec![
                Record::new().with("timeid", 1).with("name", "Morning"),
                Record::new().with("timeid", 2).with("name", "Evening"),
            ],
        );
        let mut form = FormState::create(EntityKind::Department);
        form.focus = 2;
        form.insert_char('x');
        assert_eq!(form.value("timeid"), "");
        form.cycle_option(&refs, true);
        assert_eq!(form.value("timeid"), "1");
        form.cycle_option(&refs, true);
        assert_eq!(form.display_value(2, &refs), "Evening");
        form.cycle_option(&refs, true);
        assert_eq!(form.value("timeid"), "1");
        assert_eq!(form.to_record().raw("timeid"), Some(&json!(1)));
    }

    #[test]
    fn test_edit_form_carries_id() {
        let record = Record::new().with("sid", 4).with("name", "C");
        let id = RecordId::from_integer(EntityKind::Section.id_field(), 4);
        let form = FormState::edit(EntityKind::Section, &record, id);
        assert_eq!(form.title(), "Edit Section");
        assert_eq!(form.value("name"), "C");
        assert_eq!(form.to_record().raw("sid"), Some(&json!(4)));
    }

    #[test]
    fn test_next_choice_cycles_through_none() {
        let options = vec![("1".to_string(), "A".to_string()), ("2".to_string(), "B".to_string())];
        assert_eq!(next_choice(&options, None), Some("1".into()));
        assert_eq!(next_choice(&options, Some("1")), Some("2".into()));
        assert_eq!(next_choice(&options, Some("2")), None);
    }
}
