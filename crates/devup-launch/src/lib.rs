//! Application launch: spawn the server process, stream its combined
//! output to the terminal and a log file, forward interrupts, propagate
//! its exit code.

pub mod supervisor;
pub mod tee;

pub use supervisor::{run, LaunchSpec};
pub use tee::{spawn_relay, Fanout, SharedLog};
