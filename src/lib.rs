#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod fetch;
pub mod formats;
pub mod index;
pub mod logging;
pub mod scrape;
pub mod site;
pub mod store;
