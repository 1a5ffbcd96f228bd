pub mod errors;
pub mod db;
pub mod period;
pub mod subscription;

pub use period::MonthYear;

#[cfg(test)]
mod tests;
