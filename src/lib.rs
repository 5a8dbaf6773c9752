pub mod destroyable;
pub mod events;
pub mod game;
pub mod helpers;
pub mod model;
pub mod sync;
