// App module for amrt_dashboard
// Handles dashboard state and the simulation clock

pub mod actions;
pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::App;
