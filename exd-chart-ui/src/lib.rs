//! Shared Dioxus components and Chart.js bridge for the dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the Chart.js line chart via `js_sys::eval()`
//! - `fetch`: browser `fetch` returning pipeline responses
//! - `renderer`: browser renderer/notifier for the selection pipeline
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (selector, containers, etc.)

pub mod js_bridge;
pub mod fetch;
pub mod renderer;
pub mod state;
pub mod components;
