pub mod health;
pub mod notes;
