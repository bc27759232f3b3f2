//! Terminal front end over a [`ComparisonSession`](crate::session::ComparisonSession)

pub mod commands;
pub mod display;
