pub mod common;
pub mod fetch;
pub mod init;
pub mod list;
pub mod remove;
pub mod source;
pub mod update;
