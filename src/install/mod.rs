//! First-run installation: deciding whether the installer screen is needed,
//! provisioning shortcuts, and recording the outcome.

pub mod controller;
pub mod decision;
pub mod script;
pub mod shortcut;

pub use controller::{InstallError, InstallOption, InstallerController, Transition};
pub use shortcut::{ShortcutError, ShortcutKind, ShortcutProvisioner, ShortcutStage};
