use crate::system::sorter::SortColumn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    SortBy(SortColumn),
    EnterFilterMode,
    ExitFilterMode,
    ClearFilter,
    UpdateFilter(String),
    /// Ask before sending SIGTERM to the selected process.
    RequestTerminate,
    /// SIGKILL the selected process immediately.
    ForceKill,
    Renice(i32),
    Confirm,
    Cancel,
    ToggleHelp,
    OpenSettings,
    SettingsNext,
    SettingsPrev,
    /// Raise or lower the focused setting.
    SettingsAdjust(i32),
    SaveSettings,
    None,
}
