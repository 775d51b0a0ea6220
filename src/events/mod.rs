pub mod actions;
pub mod handler;

pub use actions::{Action, Effect};
pub use handler::{map_event_to_action, AppEvent, EventHandler, SPINNER_INTERVAL};
