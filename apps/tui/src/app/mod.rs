// App module for places-wheel
// Handles application state and the actions it dispatches

pub mod actions;
pub mod input;
pub mod state;
pub mod suggest;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::AppActions;
pub use input::handle_input;
pub use state::{App, Focus};
