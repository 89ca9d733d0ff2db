pub mod drive;
pub mod media;
pub mod observability;
pub mod persistence;
pub mod providers;
