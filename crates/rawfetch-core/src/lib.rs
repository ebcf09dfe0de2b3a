pub mod config;
pub mod logging;

pub mod driver;
pub mod fetcher;
pub mod processor;
pub mod storage;
pub mod url_model;
