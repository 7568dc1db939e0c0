pub mod config;
pub mod logging;

pub mod command;
pub mod decode;
pub mod extract;
pub mod format;
pub mod headless;
pub mod host;
pub mod inserter;
pub mod load;
pub mod model;
pub mod resolve;
