pub mod components;
pub mod format;
pub mod layout;

pub use layout::render;
