pub mod store;
pub mod sync;

pub use store::{InMemoryResolutionStore, ResolutionStore};
pub use sync::ResolutionSync;
