pub mod climatology_frame;
pub mod daily_frame;
pub mod monthly_frame;
