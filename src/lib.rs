#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

pub mod cli;
pub mod config;
pub mod errors;
pub mod redriver;
pub mod results;
pub mod sqs;
pub mod work;
