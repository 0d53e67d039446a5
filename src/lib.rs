pub mod backend;
pub mod bot;
pub mod config;
pub mod dataset;
pub mod groq;
pub mod sentiment;
