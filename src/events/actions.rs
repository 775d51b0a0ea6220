use crate::refresh::{FetchKey, FetchResult, RefreshTrigger};

#[derive(Debug, Clone)]
pub enum Action {
    // User input
    Quit,
    MoveUp,
    MoveDown,
    NextProject,
    PrevProject,
    NextKind,
    PrevKind,
    OpenSelected,
    ToggleHelp,
    HideHelp,

    // Terminal and timers
    Resize { width: u16, height: u16 },
    SpinnerTick,
    Refresh(RefreshTrigger),

    // Fetch task results
    FetchCompleted(FetchResult),

    None,
}

/// Side effects requested by `App::update`, carried out by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(Vec<FetchKey>),
    OpenUrl(String),
}
