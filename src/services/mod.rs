pub mod load_service;
pub mod plot_service;
