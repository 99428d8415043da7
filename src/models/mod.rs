//! Data models shared by the loader and the plotter
//!
//! The central type is [`power::PowerTable`], the hourly table the loader
//! produces and the plotter consumes.

pub mod power;

pub use power::PowerTable;
