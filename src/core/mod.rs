pub mod buildcore;
pub mod clock;
pub mod config;
pub mod consumer;
pub mod error;
pub mod log;
pub mod producer;
pub mod queue;
