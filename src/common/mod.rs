pub mod components;
pub mod message;
pub mod plugins;
pub mod puzzle;
pub mod recordable;
pub mod resources;
pub mod save;
pub mod systems;
