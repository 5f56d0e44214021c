pub mod places;
pub mod visit;
