//! SQLite document table for stored responses

pub mod init;

pub use init::*;
