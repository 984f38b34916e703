pub mod config;
pub mod init;
pub mod items;
pub mod log;
pub mod sync;
