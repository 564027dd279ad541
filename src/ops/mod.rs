pub mod dispatch;
pub mod search;
