// ABOUTME: Command module aggregator for the projenv CLI.
// ABOUTME: Re-exports up, down, and status command handlers.

mod down;
mod engine;
mod status;
mod up;

pub use down::down;
pub use status::status;
pub use up::up;
