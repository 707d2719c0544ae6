//! # IO Module
//!
//! Adapter between a presentation client and the domain. Requests are
//! translated into controller operations and every answer carries the fresh
//! view snapshot, so the client only renders.

pub mod rest;

pub use rest::*;
