pub mod calendar_error;
pub mod calendar_source;
pub mod forex_factory;
pub mod http;
pub mod sources;
pub mod timestamps;
pub mod trading_economics;

#[cfg(test)]
mod transport_tests;
