pub mod health;
pub mod portals;
pub mod proxy;
pub mod session;
