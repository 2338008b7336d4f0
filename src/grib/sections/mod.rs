pub mod sect5;
pub mod sect7;
