pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod demo;
pub mod global;
pub mod meeting;
pub mod pipeline;
pub mod summarization;
pub mod transcription;
