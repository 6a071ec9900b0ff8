#![allow(dead_code)]

pub mod census;
pub mod config_env;
