pub mod forecast_frame;
pub mod forecast_record;
pub mod prediction;
