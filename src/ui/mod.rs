pub mod installer_view;
pub mod player_view;
pub mod theme;
pub mod tui;
