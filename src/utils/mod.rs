pub mod errors;

pub use errors::PowerError;
