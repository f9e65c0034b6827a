pub mod app;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod shutdown;
pub mod vdom;
