use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::error::{AppError, Result};
use crate::models::{CreatorRecord, CreatorReport, CreatorUpdate};
use crate::roster::RosterStore;
use crate::tui::AppAction;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

// Message for a completed report
pub struct ReportResult {
    pub creator_name: String,
    pub report: CreatorReport,
}

// Message for a finished channel search
pub struct LookupResult {
    pub name: String,
    pub notes: String,
    pub channel_id: Result<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    ConfirmRemove,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

/// In-progress add/edit form.
#[derive(Debug, Clone)]
pub struct CreatorForm {
    pub kind: FormKind,
    /// Creator being edited; `None` for add
    pub target: Option<String>,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl CreatorForm {
    pub fn add() -> Self {
        Self {
            kind: FormKind::Add,
            target: None,
            fields: ["Creator Name", "Channel ID (blank: search)", "Notes"]
                .into_iter()
                .map(|label| FormField {
                    label,
                    value: String::new(),
                })
                .collect(),
            focus: 0,
        }
    }

    pub fn edit(record: &CreatorRecord) -> Self {
        let field = |label, value: &Option<String>| FormField {
            label,
            value: value.clone().unwrap_or_default(),
        };
        Self {
            kind: FormKind::Edit,
            target: Some(record.name.clone()),
            fields: vec![
                FormField {
                    label: "Channel ID",
                    value: record.channel_id.clone(),
                },
                field("Notes", &record.notes),
                field("Requests", &record.requests),
                field("Priority", &record.priority),
                field("Status", &record.status),
            ],
            focus: 0,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        self.fields.get_mut(self.focus).map(|f| &mut f.value)
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Every edit field is sent, so clearing a box clears the column.
    fn to_update(&self) -> CreatorUpdate {
        CreatorUpdate {
            channel_id: Some(self.value(0).to_string()),
            notes: Some(self.value(1).to_string()),
            requests: Some(self.value(2).to_string()),
            priority: Some(self.value(3).to_string()),
            status: Some(self.value(4).to_string()),
        }
    }
}

/// State for one interactive session. Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct Session {
    pub selected_index: usize,
    pub selected_article: usize,
    pub form: Option<CreatorForm>,
    pub pending_removal: Option<String>,
    pub show_help: bool,
    pub status: Option<String>,
}

impl Session {
    pub fn input_mode(&self) -> InputMode {
        if self.show_help {
            InputMode::Help
        } else if self.form.is_some() {
            InputMode::Form
        } else if self.pending_removal.is_some() {
            InputMode::ConfirmRemove
        } else {
            InputMode::Normal
        }
    }
}

/// What a roster command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterOutcome {
    Added { name: String, channel_id: String },
    Updated(String),
    Removed(String),
    /// Nothing changed; the message says why
    Unchanged(String),
}

impl RosterOutcome {
    pub fn message(&self) -> String {
        match self {
            RosterOutcome::Added { name, channel_id } => {
                format!("{name} added ({channel_id})")
            }
            RosterOutcome::Updated(name) => format!("{name} updated"),
            RosterOutcome::Removed(name) => format!("{name} removed"),
            RosterOutcome::Unchanged(reason) => reason.clone(),
        }
    }
}

pub struct App {
    // Data
    pub creators: Vec<CreatorRecord>,
    pub report: Option<CreatorReport>,

    // UI State
    pub session: Session,
    spinner_index: usize,

    // Async state
    pub report_status: ReportStatus,
    pending_report: Option<String>,
    report_rx: mpsc::Receiver<ReportResult>,
    report_tx: mpsc::Sender<ReportResult>,
    /// Creator whose channel is being searched for
    pub lookup_pending: Option<String>,
    lookup_rx: mpsc::Receiver<LookupResult>,
    lookup_tx: mpsc::Sender<LookupResult>,

    // Services
    roster: RosterStore,
    dashboard: Arc<Dashboard>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let roster = RosterStore::new(&config.roster_path);
        let dashboard = Dashboard::new(config);
        Self::with_services(roster, dashboard)
    }

    pub fn with_services(roster: RosterStore, dashboard: Dashboard) -> Result<Self> {
        let creators = roster.load()?;
        let (report_tx, report_rx) = mpsc::channel(1);
        let (lookup_tx, lookup_rx) = mpsc::channel(1);

        Ok(Self {
            creators,
            report: None,
            session: Session::default(),
            spinner_index: 0,
            report_status: ReportStatus::NotLoaded,
            pending_report: None,
            report_rx,
            report_tx,
            lookup_pending: None,
            lookup_rx,
            lookup_tx,
            roster,
            dashboard: Arc::new(dashboard),
        })
    }

    pub fn selected_creator(&self) -> Option<&CreatorRecord> {
        self.creators.get(self.session.selected_index)
    }

    pub fn roster_path(&self) -> &Path {
        self.roster.path()
    }

    pub fn find_creator(&self, name: &str) -> Option<&CreatorRecord> {
        let name = name.trim();
        self.creators.iter().find(|c| c.name == name)
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_index % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.report_status == ReportStatus::Loading || self.lookup_pending.is_some() {
            self.spinner_index = self.spinner_index.wrapping_add(1);
        }
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.session.selected_index > 0 {
                    self.session.selected_index -= 1;
                    self.on_selection_changed();
                }
            }

            AppAction::MoveDown => {
                let len = self.creators.len();
                if len > 0 && self.session.selected_index < len - 1 {
                    self.session.selected_index += 1;
                    self.on_selection_changed();
                }
            }

            AppAction::LoadReport => {
                self.start_report();
            }

            AppAction::NextArticle => {
                let count = self.article_count();
                if count > 0 {
                    self.session.selected_article = (self.session.selected_article + 1) % count;
                }
            }

            AppAction::OpenArticle => {
                if let Some(url) = self.selected_article_url() {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                        self.session.status = Some(format!("Could not open {url}"));
                    }
                }
            }

            AppAction::AddCreator => {
                self.session.form = Some(CreatorForm::add());
            }

            AppAction::EditCreator => {
                if let Some(creator) = self.selected_creator() {
                    self.session.form = Some(CreatorForm::edit(creator));
                }
            }

            AppAction::RemoveCreator => {
                if let Some(creator) = self.selected_creator() {
                    self.session.pending_removal = Some(creator.name.clone());
                }
            }

            AppAction::ConfirmRemove => {
                if let Some(name) = self.session.pending_removal.take() {
                    let result = self.remove_creator(&name);
                    self.report_command(result);
                }
            }

            AppAction::CancelRemove => {
                self.session.pending_removal = None;
            }

            AppAction::ShowHelp => {
                self.session.show_help = true;
            }

            AppAction::HideHelp => {
                self.session.show_help = false;
            }

            AppAction::FormChar(c) => {
                if let Some(value) = self.session.form.as_mut().and_then(|f| f.focused_mut()) {
                    value.push(c);
                }
            }

            AppAction::FormBackspace => {
                if let Some(value) = self.session.form.as_mut().and_then(|f| f.focused_mut()) {
                    value.pop();
                }
            }

            AppAction::FormNextField => {
                if let Some(form) = self.session.form.as_mut() {
                    form.next_field();
                }
            }

            AppAction::FormPrevField => {
                if let Some(form) = self.session.form.as_mut() {
                    form.prev_field();
                }
            }

            AppAction::FormConfirm => {
                if let Some(form) = self.session.form.take() {
                    self.submit_form(form);
                }
            }

            AppAction::FormCancel => {
                self.session.form = None;
            }
        }

        Ok(false)
    }

    fn submit_form(&mut self, form: CreatorForm) {
        let result = match (form.kind, form.target.as_deref()) {
            (FormKind::Add, _) => {
                let (name, channel_id, notes) = (form.value(0), form.value(1), form.value(2));
                if self.needs_lookup(name, channel_id) {
                    self.start_channel_lookup(name.trim(), notes);
                    return;
                }
                self.add_resolved(name, channel_id, notes)
            }
            (FormKind::Edit, Some(name)) => self.edit_creator(name, form.to_update()),
            (FormKind::Edit, None) => return,
        };
        self.report_command(result);
    }

    fn report_command(&mut self, result: Result<RosterOutcome>) {
        self.session.status = Some(match result {
            Ok(outcome) => outcome.message(),
            Err(e) => {
                tracing::warn!("Roster command failed: {}", e);
                e.to_string()
            }
        });
    }

    fn on_selection_changed(&mut self) {
        self.report = None;
        self.report_status = ReportStatus::NotLoaded;
        self.pending_report = None;
        self.session.selected_article = 0;
    }

    fn article_count(&self) -> usize {
        self.report
            .as_ref()
            .and_then(|r| r.news.loaded())
            .map(|articles| articles.len())
            .unwrap_or(0)
    }

    pub fn selected_article_url(&self) -> Option<String> {
        self.report
            .as_ref()
            .and_then(|r| r.news.loaded())
            .and_then(|articles| articles.get(self.session.selected_article))
            .map(|a| a.url.clone())
    }

    /// Kick off a background load of the selected creator's report.
    fn start_report(&mut self) {
        let Some(creator) = self.selected_creator().cloned() else {
            return;
        };

        self.report_status = ReportStatus::Loading;
        self.pending_report = Some(creator.name.clone());

        let dashboard = Arc::clone(&self.dashboard);
        let tx = self.report_tx.clone();

        tokio::spawn(async move {
            let report = dashboard.build_report(&creator).await;
            let _ = tx
                .send(ReportResult {
                    creator_name: creator.name,
                    report,
                })
                .await;
        });
    }

    /// Search for the channel in the background; the add finishes in `poll_lookup_result`.
    fn start_channel_lookup(&mut self, name: &str, notes: &str) {
        self.lookup_pending = Some(name.to_string());

        let dashboard = Arc::clone(&self.dashboard);
        let tx = self.lookup_tx.clone();
        let name = name.to_string();
        let notes = notes.to_string();

        tokio::spawn(async move {
            let channel_id = dashboard.resolve_channel_id(&name).await;
            let _ = tx
                .send(LookupResult {
                    name,
                    notes,
                    channel_id,
                })
                .await;
        });
    }

    /// Poll for a finished channel search (non-blocking)
    pub fn poll_lookup_result(&mut self) {
        if let Ok(result) = self.lookup_rx.try_recv() {
            self.lookup_pending = None;
            let LookupResult {
                name,
                notes,
                channel_id,
            } = result;
            let outcome = channel_id.and_then(|found| self.finish_lookup(&name, found, &notes));
            self.report_command(outcome);
        }
    }

    /// Poll for a completed report (non-blocking)
    pub fn poll_report_result(&mut self) {
        if let Ok(result) = self.report_rx.try_recv() {
            // Only keep the report for the creator still waiting on it
            if self.pending_report.as_deref() == Some(result.creator_name.as_str()) {
                self.report = Some(result.report);
                self.report_status = ReportStatus::Loaded;
                self.session.selected_article = 0;
                self.pending_report = None;
            }
        }
    }

    /// Build a report in the foreground, for headless use.
    pub async fn report_for(&self, name: &str) -> Result<Option<CreatorReport>> {
        let Some(creator) = self.roster.find(name)? else {
            return Ok(None);
        };
        Ok(Some(self.dashboard.build_report(&creator).await))
    }

    fn reload_creators(&mut self) -> Result<()> {
        self.creators = self.roster.load()?;
        let len = self.creators.len();
        if len == 0 {
            self.session.selected_index = 0;
        } else if self.session.selected_index >= len {
            self.session.selected_index = len - 1;
        }
        Ok(())
    }

    fn select_by_name(&mut self, name: &str) {
        if let Some(index) = self.creators.iter().position(|c| c.name == name) {
            if index != self.session.selected_index {
                self.session.selected_index = index;
                self.on_selection_changed();
            }
        }
    }

    fn needs_lookup(&self, name: &str, channel_id: &str) -> bool {
        channel_id.trim().is_empty()
            && !name.trim().is_empty()
            && self.find_creator(name).is_none()
    }

    /// Add a creator, searching for the channel when no id is given.
    pub async fn add_creator(
        &mut self,
        name: &str,
        channel_id: &str,
        notes: &str,
    ) -> Result<RosterOutcome> {
        if self.needs_lookup(name, channel_id) {
            let name = name.trim();
            let found = self.dashboard.resolve_channel_id(name).await?;
            return self.finish_lookup(name, found, notes);
        }
        self.add_resolved(name, channel_id, notes)
    }

    fn finish_lookup(
        &mut self,
        name: &str,
        found: Option<String>,
        notes: &str,
    ) -> Result<RosterOutcome> {
        match found {
            Some(channel_id) => {
                tracing::info!("Resolved {} to channel {}", name, channel_id);
                self.add_resolved(name, &channel_id, notes)
            }
            None => Ok(RosterOutcome::Unchanged(format!(
                "No channel found for '{name}'"
            ))),
        }
    }

    fn add_resolved(&mut self, name: &str, channel_id: &str, notes: &str) -> Result<RosterOutcome> {
        let name = name.trim();
        if self.find_creator(name).is_some() {
            return Err(AppError::DuplicateCreator(name.to_string()));
        }

        let channel_id = channel_id.trim().to_string();
        let record = CreatorRecord::new(name, channel_id.clone()).with_notes(notes.trim());
        self.roster.add(record)?;
        self.reload_creators()?;
        self.select_by_name(name);

        Ok(RosterOutcome::Added {
            name: name.to_string(),
            channel_id,
        })
    }

    pub fn edit_creator(&mut self, name: &str, update: CreatorUpdate) -> Result<RosterOutcome> {
        if update.is_empty() {
            return Ok(RosterOutcome::Unchanged("Nothing to update".to_string()));
        }
        if !self.roster.update(name, update)? {
            return Ok(RosterOutcome::Unchanged(format!(
                "{} is not in the roster",
                name.trim()
            )));
        }
        self.reload_creators()?;
        Ok(RosterOutcome::Updated(name.trim().to_string()))
    }

    /// Removing a name that is not in the roster changes nothing and is not an error.
    pub fn remove_creator(&mut self, name: &str) -> Result<RosterOutcome> {
        let selected = self.selected_creator().map(|c| c.name.clone());
        if !self.roster.remove(name)? {
            return Ok(RosterOutcome::Unchanged(format!(
                "{} is not in the roster",
                name.trim()
            )));
        }
        self.reload_creators()?;
        if selected.as_deref() == Some(name.trim()) {
            self.on_selection_changed();
        }
        Ok(RosterOutcome::Removed(name.trim().to_string()))
    }
}
