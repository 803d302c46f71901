pub mod dispatch;
pub mod interactive;
