pub mod chat;
pub mod health;
pub mod lab;
pub mod openapi;
pub mod predict;
