pub mod get_chart;
pub mod get_data;
pub mod render_page;

pub use get_chart::*;
pub use get_data::*;
pub use render_page::*;
