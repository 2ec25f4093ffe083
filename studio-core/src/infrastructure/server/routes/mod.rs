pub mod health;
pub mod providers;
pub mod stream;
pub mod tasks;
