pub mod currency;
pub mod list;
pub mod setup;
pub mod trend;
pub mod ui;
pub mod units;
