use crate::app::App;
use crate::events::actions::Action;
use crate::refresh::RefreshTrigger;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);
const INPUT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Resize(u16, u16),
    RefreshTick,
    SpinnerTick,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    _tx: mpsc::UnboundedSender<AppEvent>, // Keep alive for senders
}

impl EventHandler {
    /// Starts the terminal reader and the timers. A zero `refresh_interval` turns the
    /// refresh timer off.
    pub fn new(refresh_interval: Duration, spinner_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // crossterm's poll/read block, so the reader gets its own thread
        let input_tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            while !input_tx.is_closed() {
                if !matches!(event::poll(INPUT_POLL), Ok(true)) {
                    continue;
                }
                let app_event = match event::read() {
                    Ok(Event::Key(key)) => AppEvent::Input(key),
                    Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to read terminal event");
                        continue;
                    }
                };
                if input_tx.send(app_event).is_err() {
                    break;
                }
            }
        });

        let spinner_tx = tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(spinner_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if spinner_tx.send(AppEvent::SpinnerTick).is_err() {
                    break;
                }
            }
        });

        if !refresh_interval.is_zero() {
            let refresh_tx = tx.clone();
            tokio::spawn(async move {
                // First tick one interval after startup; the startup refresh covers t=0
                let mut interval =
                    interval_at(Instant::now() + refresh_interval, refresh_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if refresh_tx.send(AppEvent::RefreshTick).is_err() {
                        break;
                    }
                }
            });
        }

        Self { rx, _tx: tx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

pub fn map_event_to_action(event: AppEvent, app: &App) -> Action {
    match event {
        AppEvent::Input(key) => map_key(key, app),
        AppEvent::Resize(width, height) => Action::Resize { width, height },
        AppEvent::RefreshTick => Action::Refresh(RefreshTrigger::Timer),
        AppEvent::SpinnerTick => Action::SpinnerTick,
    }
}

fn map_key(key: KeyEvent, app: &App) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.show_help {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Action::HideHelp,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Left | KeyCode::Char('h') => Action::PrevProject,
        KeyCode::Right | KeyCode::Char('l') => Action::NextProject,
        KeyCode::Tab => Action::NextKind,
        KeyCode::BackTab => Action::PrevKind,
        KeyCode::Enter => Action::OpenSelected,
        KeyCode::Char('r') => Action::Refresh(RefreshTrigger::Manual),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::PortalUrls;
    use crate::config::DisplayConfig;

    fn app() -> App {
        App::new(
            vec!["Web".to_string()],
            &DisplayConfig::default(),
            PortalUrls::new("https://dev.azure.com", "contoso").unwrap(),
        )
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_navigation_keys() {
        let app = app();
        assert!(matches!(map_event_to_action(key(KeyCode::Char('j')), &app), Action::MoveDown));
        assert!(matches!(map_event_to_action(key(KeyCode::Up), &app), Action::MoveUp));
        assert!(matches!(map_event_to_action(key(KeyCode::Char('l')), &app), Action::NextProject));
        assert!(matches!(map_event_to_action(key(KeyCode::Left), &app), Action::PrevProject));
        assert!(matches!(map_event_to_action(key(KeyCode::Tab), &app), Action::NextKind));
        assert!(matches!(map_event_to_action(key(KeyCode::BackTab), &app), Action::PrevKind));
        assert!(matches!(map_event_to_action(key(KeyCode::Enter), &app), Action::OpenSelected));
    }

    #[test]
    fn test_refresh_and_quit_keys() {
        let app = app();
        assert!(matches!(
            map_event_to_action(key(KeyCode::Char('r')), &app),
            Action::Refresh(RefreshTrigger::Manual)
        ));
        assert!(matches!(map_event_to_action(key(KeyCode::Char('q')), &app), Action::Quit));

        let ctrl_c = AppEvent::Input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(map_event_to_action(ctrl_c, &app), Action::Quit));
    }

    #[test]
    fn test_help_mode_swallows_keys() {
        let mut app = app();
        app.show_help = true;

        assert!(matches!(map_event_to_action(key(KeyCode::Esc), &app), Action::HideHelp));
        assert!(matches!(map_event_to_action(key(KeyCode::Char('q')), &app), Action::HideHelp));
        assert!(matches!(map_event_to_action(key(KeyCode::Char('?')), &app), Action::HideHelp));
        assert!(matches!(map_event_to_action(key(KeyCode::Char('j')), &app), Action::None));
    }

    #[test]
    fn test_timer_and_resize_events() {
        let app = app();
        assert!(matches!(
            map_event_to_action(AppEvent::RefreshTick, &app),
            Action::Refresh(RefreshTrigger::Timer)
        ));
        assert!(matches!(
            map_event_to_action(AppEvent::Resize(80, 24), &app),
            Action::Resize { width: 80, height: 24 }
        ));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let app = app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(matches!(map_event_to_action(AppEvent::Input(release), &app), Action::None));
    }
}
