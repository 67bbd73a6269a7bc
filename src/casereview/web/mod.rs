pub mod cmp_utils;
pub mod config;
pub mod scope;
pub mod search;
pub mod sort;
pub mod export;
pub mod frequencies;
pub mod summary;
pub mod matchmaker;
pub mod page_header;
pub mod views;
