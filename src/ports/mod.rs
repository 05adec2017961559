//! Port traits at the I/O seams.

pub mod clock_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;
