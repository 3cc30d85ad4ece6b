pub mod app;
pub mod catalog;
pub mod config;
pub mod diary;
pub mod entries;
pub mod error;
pub mod state;
pub mod storage;
