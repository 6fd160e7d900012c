pub mod cpu;
pub mod error;
pub mod history;
pub mod memory;
pub mod monitor;
pub mod procfs;
pub mod snapshot;
pub mod source;
