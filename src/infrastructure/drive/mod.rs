mod drive_store;

pub use drive_store::GoogleDriveStore;
