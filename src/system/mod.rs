pub mod collector;
pub mod control;
pub mod metrics;
pub mod platform;
pub mod procfs;
pub mod record;
pub mod snapshot;
pub mod sorter;
pub mod users;
