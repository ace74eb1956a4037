pub mod app;
pub mod generate;
