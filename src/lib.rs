pub mod clicker;
pub mod config;
pub mod input;
pub mod storage;
pub mod time;
pub mod widgets;
