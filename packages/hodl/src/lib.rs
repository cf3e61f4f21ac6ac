#![allow(non_snake_case)]
pub mod auth;
pub mod cdp;
pub mod helpers;
pub mod math;
pub mod token_factory;
pub mod types;
