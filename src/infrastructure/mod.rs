pub mod config;
pub mod notification;
pub mod persistence;
pub mod scheduler;
pub mod security;
pub mod storage;
