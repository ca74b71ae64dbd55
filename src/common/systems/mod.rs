pub mod actor;
pub mod clock;
pub mod lighting;
pub mod save;
