//! Widgets
//!
//! Stateless ratatui widgets drawn from the controller snapshot.

mod sprite_panel;
mod toast_list;

pub use sprite_panel::SpritePanel;
pub use toast_list::ToastList;
