mod bookkeeping;
mod creatures;

pub use bookkeeping::BookkeepingSystem;
pub use creatures::CreatureSystem;
