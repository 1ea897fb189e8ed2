// UI tree model, geometry and element selection

pub mod geometry;
pub mod node;
pub mod selector;

pub use geometry::{Bounds, Location, Size, Viewport, is_displayed, is_displayed_in_viewport};
pub use node::{Descendants, UiNode};
pub use selector::Selector;
