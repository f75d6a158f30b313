pub mod providers;
pub mod uploads;

pub use uploads::TempUpload;
