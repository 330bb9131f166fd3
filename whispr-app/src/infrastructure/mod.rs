pub mod config;
pub mod whispr_api;
