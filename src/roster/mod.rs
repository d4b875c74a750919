mod store;

pub use store::RosterStore;
