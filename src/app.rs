use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::action::{Action, Direction};
use crate::config::{AlertsConfig, Config, save_config};
use crate::system::control::{self, ControlResult, Signal};
use crate::system::record::ProcessRecord;
use crate::system::snapshot::Frame;
use crate::system::sorter::{SortColumn, SortSpec, ranked_view};

const STATUS_TTL: Duration = Duration::from_secs(3);
const RENICE_STEP: i32 = 5;
const THRESHOLD_STEP: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Terminate { pid: u32, name: String },
    Renice { pid: u32, name: String, delta: i32 },
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::Terminate { pid, name } => format!("Send SIGTERM to {name} (PID {pid})?"),
            PendingAction::Renice { pid, name, delta } => {
                format!("Change nice of {name} (PID {pid}) by {delta:+}?")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
    Settings,
    Confirm(PendingAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    CpuThreshold,
    MemThreshold,
    ActiveWebhook,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [
        SettingsField::CpuThreshold,
        SettingsField::MemThreshold,
        SettingsField::ActiveWebhook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::CpuThreshold => "CPU alert threshold",
            SettingsField::MemThreshold => "Memory alert threshold",
            SettingsField::ActiveWebhook => "Active webhook",
        }
    }
}

/// Alert settings being edited in the overlay. Nothing is applied until saved.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    pub focus: usize,
    pub alerts: AlertsConfig,
}

impl SettingsDraft {
    pub fn field(&self) -> SettingsField {
        SettingsField::ALL[self.focus % SettingsField::ALL.len()]
    }

    pub fn value_text(&self, field: SettingsField) -> String {
        match field {
            SettingsField::CpuThreshold => format!("{:.0}%", self.alerts.cpu_threshold),
            SettingsField::MemThreshold => format!("{:.0}%", self.alerts.mem_threshold),
            SettingsField::ActiveWebhook if self.alerts.active_webhook.is_empty() => {
                "(none)".to_string()
            }
            SettingsField::ActiveWebhook => self.alerts.active_webhook.clone(),
        }
    }

    fn adjust(&mut self, step: i32) {
        match self.field() {
            SettingsField::CpuThreshold => {
                self.alerts.cpu_threshold = bump(self.alerts.cpu_threshold, step);
            }
            SettingsField::MemThreshold => {
                self.alerts.mem_threshold = bump(self.alerts.mem_threshold, step);
            }
            SettingsField::ActiveWebhook => {
                // "" (none) followed by every configured name, in order.
                let mut names: Vec<&str> = vec![""];
                names.extend(self.alerts.webhooks.keys().map(String::as_str));
                let current = names
                    .iter()
                    .position(|n| *n == self.alerts.active_webhook)
                    .unwrap_or(0) as i32;
                let next = (current + step).rem_euclid(names.len() as i32) as usize;
                self.alerts.active_webhook = names[next].to_string();
            }
        }
    }
}

fn bump(value: f64, step: i32) -> f64 {
    (value + step as f64 * THRESHOLD_STEP).clamp(THRESHOLD_STEP, 100.0)
}

pub struct App {
    pub running: bool,
    pub frame: Option<Frame>,
    /// Filtered and sorted rows currently shown in the table.
    pub rows: Vec<ProcessRecord>,
    pub table_state: TableState,
    pub sort: SortSpec,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub status_message: Option<(String, Instant)>,
    pub settings: Option<SettingsDraft>,
    pub config: Config,
    pub clock_ticks: u64,
    /// Visible table rows, updated by the renderer for PageUp/PageDown.
    pub page_size: usize,
    config_path: Option<PathBuf>,
    selected_pid: Option<u32>,
}

impl App {
    pub fn new(config: Config, config_path: Option<PathBuf>, clock_ticks: u64) -> Self {
        let sort = SortSpec::new(SortColumn::from_str_config(&config.general.default_sort));
        App {
            running: true,
            frame: None,
            rows: Vec::new(),
            table_state: TableState::default(),
            sort,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            status_message: None,
            settings: None,
            config,
            clock_ticks: clock_ticks.max(1),
            page_size: 10,
            config_path,
            selected_pid: None,
        }
    }

    pub fn apply_frame(&mut self, frame: Frame) {
        self.frame = Some(frame);
        self.rebuild_rows();
    }

    /// Recomputes the visible rows, keeping the selection on the same pid
    /// when it is still listed.
    fn rebuild_rows(&mut self) {
        let Some(frame) = &self.frame else {
            return;
        };
        self.rows = ranked_view(
            &frame.records,
            &self.filter_text,
            self.sort,
            self.config.general.max_rows,
        );

        let index = self
            .selected_pid
            .and_then(|pid| self.rows.iter().position(|r| r.pid == pid))
            .or_else(|| {
                let current = self.table_state.selected().unwrap_or(0);
                (!self.rows.is_empty()).then(|| current.min(self.rows.len() - 1))
            });
        self.table_state.select(index);
        self.selected_pid = index.map(|i| self.rows[i].pid);
    }

    pub fn selected(&self) -> Option<&ProcessRecord> {
        self.table_state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let Some((_, created)) = &self.status_message
            && now.saturating_duration_since(*created) >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match &self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => match key.code {
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => Action::ToggleHelp,
                _ => Action::None,
            },
            InputMode::Settings => match key.code {
                KeyCode::Up | KeyCode::BackTab => Action::SettingsPrev,
                KeyCode::Down | KeyCode::Tab => Action::SettingsNext,
                KeyCode::Left | KeyCode::Char('-') => Action::SettingsAdjust(-1),
                KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
                    Action::SettingsAdjust(1)
                }
                KeyCode::Enter => Action::SaveSettings,
                KeyCode::Esc => Action::Cancel,
                _ => Action::None,
            },
            InputMode::Confirm(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Confirm,
                KeyCode::Char('n') | KeyCode::Esc => Action::Cancel,
                _ => Action::None,
            },
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => Action::Navigate(Direction::Up),
            KeyCode::Down => Action::Navigate(Direction::Down),
            KeyCode::PageUp => Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => Action::Navigate(Direction::PageDown),
            KeyCode::Home => Action::Navigate(Direction::Home),
            KeyCode::End => Action::Navigate(Direction::End),
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') => Action::EnterFilterMode,
            KeyCode::Char('c') => Action::SortBy(SortColumn::Cpu),
            KeyCode::Char('m') => Action::SortBy(SortColumn::Memory),
            KeyCode::Char('p') => Action::SortBy(SortColumn::Pid),
            KeyCode::Char('u') => Action::SortBy(SortColumn::User),
            KeyCode::Char('v') => Action::SortBy(SortColumn::VirtualSize),
            KeyCode::Char('r') => Action::SortBy(SortColumn::ResidentSize),
            KeyCode::Char('t') => Action::SortBy(SortColumn::Time),
            KeyCode::Char('k') => Action::RequestTerminate,
            KeyCode::Char('K') => Action::ForceKill,
            KeyCode::Char('n') => Action::Renice(-RENICE_STEP),
            KeyCode::Char('N') => Action::Renice(RENICE_STEP),
            KeyCode::Char('s') => Action::OpenSettings,
            KeyCode::Char('?') => Action::ToggleHelp,
            _ => Action::None,
        }
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::SortBy(column) => {
                self.sort.toggle(column);
                self.rebuild_rows();
            }
            Action::EnterFilterMode => self.input_mode = InputMode::Filter,
            Action::ExitFilterMode => self.input_mode = InputMode::Normal,
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.rebuild_rows();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.rebuild_rows();
            }
            Action::RequestTerminate => {
                if let Some((pid, name)) = self.selected_target() {
                    self.input_mode = InputMode::Confirm(PendingAction::Terminate { pid, name });
                }
            }
            Action::ForceKill => {
                if let Some((pid, _)) = self.selected_target() {
                    let result = control::send_signal(pid, Signal::Kill);
                    self.report(result);
                }
            }
            Action::Renice(delta) => {
                if let Some((pid, name)) = self.selected_target() {
                    self.input_mode =
                        InputMode::Confirm(PendingAction::Renice { pid, name, delta });
                }
            }
            Action::Confirm => {
                let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
                if let InputMode::Confirm(pending) = mode {
                    let result = match pending {
                        PendingAction::Terminate { pid, .. } => control::send_signal(pid, Signal::Term),
                        PendingAction::Renice { pid, delta, .. } => control::renice(pid, delta),
                    };
                    self.report(result);
                }
            }
            Action::Cancel => {
                self.settings = None;
                self.input_mode = InputMode::Normal;
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::OpenSettings => {
                self.settings = Some(SettingsDraft {
                    focus: 0,
                    alerts: self.config.alerts.clone(),
                });
                self.input_mode = InputMode::Settings;
            }
            Action::SettingsNext => {
                if let Some(draft) = &mut self.settings {
                    draft.focus = (draft.focus + 1) % SettingsField::ALL.len();
                }
            }
            Action::SettingsPrev => {
                if let Some(draft) = &mut self.settings {
                    draft.focus = (draft.focus + SettingsField::ALL.len() - 1) % SettingsField::ALL.len();
                }
            }
            Action::SettingsAdjust(step) => {
                if let Some(draft) = &mut self.settings {
                    draft.adjust(step);
                }
            }
            Action::SaveSettings => self.save_settings(),
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let current = self.table_state.selected().unwrap_or(0);
        let page = self.page_size.max(1);
        let next = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::PageUp => current.saturating_sub(page),
            Direction::PageDown => (current + page).min(last),
            Direction::Home => 0,
            Direction::End => last,
        };
        self.table_state.select(Some(next));
        self.selected_pid = Some(self.rows[next].pid);
    }

    fn selected_target(&mut self) -> Option<(u32, String)> {
        let (pid, name, alive) = {
            let record = self.selected()?;
            (record.pid, record.program().to_string(), record.alive)
        };
        if !alive {
            self.set_status(format!("PID {pid} has already exited"));
            return None;
        }
        Some((pid, name))
    }

    fn report(&mut self, result: ControlResult) {
        if result.is_success() {
            tracing::info!("{}", result.message());
        } else {
            tracing::warn!("{}", result.message());
        }
        self.set_status(result.message());
    }

    fn save_settings(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some(draft) = self.settings.take() else {
            return;
        };
        self.config.alerts = draft.alerts;
        let Some(path) = &self.config_path else {
            self.set_status("Settings applied (no config file)");
            return;
        };
        match save_config(path, &self.config) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "settings saved");
                self.set_status("Settings saved");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "saving settings failed: {err:#}");
                self.set_status(format!("Could not save settings: {err}"));
            }
        }
    }
}
