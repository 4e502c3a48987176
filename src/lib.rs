pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod schedule;
pub mod session;
pub mod study;
