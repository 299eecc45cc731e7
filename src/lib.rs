//! Virtual Try-On Service
//!
//! This library provides the core functionality for the virtual-tryon system,
//! which places jewelry and apparel on a customer photo by delegating image
//! generation to Runway's asynchronous task API.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
