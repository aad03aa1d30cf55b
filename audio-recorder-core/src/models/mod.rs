pub mod ack;
pub mod audio_format;
pub mod audio_models;
pub mod config;
pub mod error;
pub mod state;
