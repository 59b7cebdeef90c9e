pub mod config;
pub mod driver;
pub mod effects;
pub mod events;
pub mod feedback;
pub mod macros;
pub mod menu;
pub mod sys;
pub mod trace;
