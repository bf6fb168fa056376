mod chart;
mod ticker_bar;
mod view;

pub use chart::ForecastChart;
pub use ticker_bar::TickerBar;
pub use view::ForecastDashboard;
