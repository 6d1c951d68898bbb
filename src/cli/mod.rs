pub mod commands;
pub mod init;
pub mod task;
pub mod watch;

pub use commands::*;
