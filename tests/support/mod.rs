#![allow(dead_code)]

pub mod graph;
pub mod optimizer;
pub mod sapi;
