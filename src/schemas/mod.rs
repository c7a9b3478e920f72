//! Schemas of the Favre directories application
//!
//! Each schema is a plain validator assembled from the core combinators:
//!
//! - [`config`]: bootstrap configuration, with typed loaders
//! - [`forms`]: request bodies and the 400 rejection body
//! - [`queries`]: request query parameters
//! - [`records`]: rows of the CSV imports

pub mod config;
pub mod forms;
pub mod queries;
pub mod records;
