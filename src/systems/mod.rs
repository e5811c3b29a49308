mod bookkeeping;
mod fire_spread;
mod firefighters;
mod growth;

pub use bookkeeping::BookkeepingSystem;
pub use fire_spread::FireSpreadSystem;
pub use firefighters::FirefighterSystem;
pub use growth::GrowthSystem;
