mod interval_ticker;

pub use interval_ticker::IntervalResendTicker;
