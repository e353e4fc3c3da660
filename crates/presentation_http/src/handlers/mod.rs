//! HTTP request handlers

pub mod dto;
pub mod geo;
pub mod health;
pub mod search;
