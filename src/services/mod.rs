pub mod providers;
pub mod search;
pub mod sources;
