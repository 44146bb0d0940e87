//! Face restoration and photo enhancement pipeline, shared by the HTTP
//! API, the CLI batch tool and the interactive web UI.

pub mod config;
pub mod engine;
pub mod error;
pub mod image_codec;
pub mod service;
pub mod web;
