pub mod result;
pub mod user;
