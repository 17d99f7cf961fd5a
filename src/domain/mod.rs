// Domain layer - Pure models and rules, no I/O
pub mod dashboard;
pub mod history;
pub mod pie;
pub mod weather;
