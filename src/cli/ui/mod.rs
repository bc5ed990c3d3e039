pub mod table_renderer;
pub mod views;
