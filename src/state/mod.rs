//! Application state module

mod app_state;
mod forms;
mod pipeline;
mod reset_timer;

pub use app_state::*;
pub use forms::*;
pub use pipeline::*;
pub use reset_timer::ResetTimer;
