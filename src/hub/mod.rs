pub mod hub;
pub mod session;
pub mod store;

pub use hub::Hub;
pub use session::{Session, SessionState};
pub use store::CanvasStore;
