//! Routing, air-quality and traffic-incident proxy for the route view.

pub mod api;
pub mod config;
pub mod state;
pub mod upstream;
