pub mod config;
pub mod fsstore;
pub mod refs;
pub mod server;

pub use config::Config;
pub use fsstore::FsBlobStore;
pub use refs::RefStore;
pub use server::{AppState, PlainServer};
