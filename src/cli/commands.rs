pub mod forecast;
pub mod serve;

pub use forecast::forecast_once;
pub use serve::serve;
