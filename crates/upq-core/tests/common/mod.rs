#![allow(dead_code)]

pub mod push_server;
pub mod upload_server;
