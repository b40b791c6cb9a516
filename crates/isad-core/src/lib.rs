pub mod config;
pub mod logging;

pub mod control;
pub mod error;
pub mod media;
pub mod saver;
pub mod scan;
pub mod scheduler;
pub mod stream;
pub mod token;
