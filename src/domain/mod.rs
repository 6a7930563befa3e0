pub mod annotations;
pub mod chart;
pub mod controls;
pub mod errors;
pub mod events;
pub mod logging;
pub mod market_data;
