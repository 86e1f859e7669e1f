pub mod canned;
pub mod soap;
