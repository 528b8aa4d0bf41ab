pub mod boss;
pub mod motion;
pub mod projectiles;
pub mod spawn;
