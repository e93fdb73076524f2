#![allow(dead_code)]

pub mod log_capture;
pub mod source_fixtures;
pub mod store_helpers;
