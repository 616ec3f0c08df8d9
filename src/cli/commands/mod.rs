pub mod backup;
pub mod check;
pub mod config;
pub mod db;
pub mod directory;
pub mod init;
pub mod list;
pub mod log;
pub mod tareo;
pub mod validate;
