pub mod aggregate;
pub mod analyze;
pub mod check;
pub mod cli;
pub mod collect;
pub mod config;
pub mod deliver;
pub mod error;
pub mod git;
pub mod inspector;
pub mod logger;
pub mod model;
pub mod report;
pub mod util;
pub mod window;
