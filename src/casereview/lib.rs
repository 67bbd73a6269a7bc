extern crate regex;
extern crate chrono;
extern crate serde_json;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate serde_derive;

pub mod types;
pub mod data_types;
pub mod constants;
pub mod utils;
pub mod store;
pub mod ui_state;
pub mod memo;
pub mod web;
pub mod bio;
