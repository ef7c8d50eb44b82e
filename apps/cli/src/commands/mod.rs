pub mod actions;
pub mod call;
