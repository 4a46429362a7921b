pub mod conditional_paralell;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pixels;
pub mod sepia;

pub use error::{Result, SepiaError};
