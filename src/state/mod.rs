pub mod camera;
pub mod gesture;
pub mod history;
pub mod lod;
pub mod shortcuts;
pub mod viewport;

pub use camera::Camera;
pub use history::{HistoryKeys, HistoryStore};
pub use viewport::ViewportController;
