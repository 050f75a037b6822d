//! Street network model before scoring

pub mod components;
pub mod network;
pub mod projection;

pub use components::{PointFeature, SegmentInput, StreetEdge, StreetNode};
pub use network::{IndexedPoint, StreetGraph, StreetNetwork};
pub use projection::Projection;
