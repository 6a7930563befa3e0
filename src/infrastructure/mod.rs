pub mod rendering;
pub mod sample_data;
pub mod services;

pub use sample_data::EmbeddedStocksRepository;
