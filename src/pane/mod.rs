pub mod layout;
#[allow(clippy::module_inception)]
pub mod pane;
