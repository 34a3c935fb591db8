#![allow(dead_code)]

pub mod config;
pub mod logging;
pub mod models;
pub mod quiz;
pub mod seed;
pub mod sim;
pub mod store;
