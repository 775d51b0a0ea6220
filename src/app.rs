use crate::azure::PortalUrls;
use crate::config::DisplayConfig;
use crate::error::FetchError;
use crate::events::actions::{Action, Effect};
use crate::refresh::{FetchKey, FetchPhase, FetchResult, RefreshTrigger, ResourceData, ResourceKind};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::Duration;

/// Fetch state of one (project, kind) pair. Data survives failures so stale rows stay
/// on screen next to the error.
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    pub phase: FetchPhase,
    pub data: Option<ResourceData>,
    pub error: Option<FetchError>,
}

impl ResourceState {
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// The error to show, if any. Loading takes precedence.
    pub fn visible_error(&self) -> Option<&FetchError> {
        if self.is_loading() {
            None
        } else {
            self.error.as_ref()
        }
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, ResourceData::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply(&mut self, outcome: Result<ResourceData, FetchError>) {
        match outcome {
            Ok(data) => {
                self.phase = FetchPhase::Succeeded;
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                self.phase = FetchPhase::Failed;
                self.error = Some(err);
            }
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub show_help: bool,

    // Cursor state
    pub projects: Vec<String>,
    pub active_project: usize,
    pub active_kind: ResourceKind,
    pub selected_row: usize,
    pub width: u16,
    pub height: u16,

    // Status
    pub last_refresh: Option<DateTime<Local>>,
    pub spinner_frame: usize,
    pub refresh_interval: Duration,
    pub date_format: String,

    resources: HashMap<FetchKey, ResourceState>,
    portal: PortalUrls,
}

impl App {
    pub fn new(projects: Vec<String>, display: &DisplayConfig, portal: PortalUrls) -> Self {
        let resources = projects
            .iter()
            .flat_map(|project| {
                ResourceKind::ALL
                    .iter()
                    .map(move |kind| (FetchKey::new(project.clone(), *kind), ResourceState::default()))
            })
            .collect();

        Self {
            should_quit: false,
            show_help: false,
            projects,
            active_project: 0,
            active_kind: ResourceKind::Builds,
            selected_row: 0,
            width: 0,
            height: 0,
            last_refresh: None,
            spinner_frame: 0,
            refresh_interval: display.refresh_interval(),
            date_format: display.date_format.clone(),
            resources,
            portal,
        }
    }

    pub fn current_project(&self) -> Option<&str> {
        self.projects.get(self.active_project).map(String::as_str)
    }

    pub fn state(&self, key: &FetchKey) -> Option<&ResourceState> {
        self.resources.get(key)
    }

    /// State of `kind` for the active project.
    pub fn section_state(&self, kind: ResourceKind) -> Option<&ResourceState> {
        let project = self.current_project()?;
        self.resources.get(&FetchKey::new(project, kind))
    }

    pub fn current_state(&self) -> Option<&ResourceState> {
        self.section_state(self.active_kind)
    }

    pub fn current_records(&self) -> Option<&ResourceData> {
        self.current_state().and_then(|state| state.data.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        self.current_state().is_some_and(ResourceState::is_loading)
    }

    pub fn current_error(&self) -> Option<&FetchError> {
        self.current_state().and_then(ResourceState::visible_error)
    }

    pub fn max_rows(&self) -> usize {
        self.current_state().map_or(0, ResourceState::len)
    }

    pub fn is_any_loading(&self) -> bool {
        self.resources.values().any(ResourceState::is_loading)
    }

    pub fn loading_count(&self) -> usize {
        self.resources.values().filter(|s| s.is_loading()).count()
    }

    pub fn error_count(&self) -> usize {
        self.resources
            .values()
            .filter(|s| s.phase == FetchPhase::Failed)
            .count()
    }

    /// Link for the selected row: the vendor's own web link, or one built from the ids.
    pub fn selected_url(&self) -> Option<String> {
        let project = self.current_project()?;
        let row = self.selected_row;
        let (vendor_link, synthesized) = match self.current_records()? {
            ResourceData::Builds(builds) => {
                let build = builds.get(row)?;
                (&build.links.web.href, self.portal.build(project, build.id))
            }
            ResourceData::Releases(releases) => {
                let release = releases.get(row)?;
                (&release.links.web.href, self.portal.release(project, release.id))
            }
            ResourceData::PullRequests(prs) => {
                let pr = prs.get(row)?;
                // PR payloads link to the REST resource, never to the web page
                return Some(self.portal.pull_request(
                    project,
                    &pr.repository.name,
                    pr.pull_request_id,
                ));
            }
        };

        if vendor_link.is_empty() {
            Some(synthesized)
        } else {
            Some(vendor_link.clone())
        }
    }

    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }

            Action::MoveUp => {
                self.selected_row = self.selected_row.saturating_sub(1);
                None
            }

            Action::MoveDown => {
                if self.selected_row + 1 < self.max_rows() {
                    self.selected_row += 1;
                }
                None
            }

            Action::NextProject => {
                if self.active_project + 1 < self.projects.len() {
                    self.active_project += 1;
                }
                self.selected_row = 0;
                None
            }

            Action::PrevProject => {
                self.active_project = self.active_project.saturating_sub(1);
                self.selected_row = 0;
                None
            }

            Action::NextKind => {
                self.active_kind = self.active_kind.next();
                self.selected_row = 0;
                None
            }

            Action::PrevKind => {
                self.active_kind = self.active_kind.prev();
                self.selected_row = 0;
                None
            }

            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }

            Action::HideHelp => {
                self.show_help = false;
                None
            }

            Action::Resize { width, height } => {
                self.width = width;
                self.height = height;
                None
            }

            Action::SpinnerTick => {
                if self.is_any_loading() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
                None
            }

            Action::OpenSelected => self.selected_url().map(Effect::OpenUrl),

            Action::Refresh(trigger) => self.begin_refresh(trigger),

            Action::FetchCompleted(result) => {
                self.apply_fetch_result(result);
                None
            }

            Action::None => None,
        }
    }

    /// Marks every key loading and asks for all of them to be fetched, unless a
    /// previous cycle is still running.
    fn begin_refresh(&mut self, trigger: RefreshTrigger) -> Option<Effect> {
        if self.is_any_loading() {
            tracing::debug!(
                ?trigger,
                loading = self.loading_count(),
                "refresh rejected while fetches are in flight"
            );
            return None;
        }

        let mut keys: Vec<FetchKey> = self.resources.keys().cloned().collect();
        keys.sort_by(|a, b| {
            let pos = |key: &FetchKey| self.projects.iter().position(|p| *p == key.project);
            pos(a)
                .cmp(&pos(b))
                .then(a.kind.index().cmp(&b.kind.index()))
        });

        for state in self.resources.values_mut() {
            state.phase = FetchPhase::Loading;
        }
        self.last_refresh = Some(Local::now());

        tracing::info!(?trigger, keys = keys.len(), "refresh started");
        Some(Effect::Fetch(keys))
    }

    pub fn apply_fetch_result(&mut self, result: FetchResult) {
        let Some(state) = self.resources.get_mut(&result.key) else {
            tracing::warn!(key = %result.key, "result for unknown fetch key");
            return;
        };
        state.apply(result.outcome);

        let max_rows = self.max_rows();
        self.selected_row = self.selected_row.min(max_rows.saturating_sub(1));
    }
}
