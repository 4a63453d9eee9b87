//! inkdigit core - basic data structures for ink recognition
//!
//! This crate provides the fundamental types used throughout the inkdigit
//! recognizer:
//!
//! - [`Point`] / [`BoundingBox`] - geometry utilities
//! - [`Stroke`] / [`StrokeBuilder`] - captured pen gestures
//! - [`PixelComponent`] - 8-connected pixel sets from a raster
//! - [`Shape`] - common view over strokes and components
//! - [`BitGrid`] - binary raster (input bitmap and scratch canvas)
//! - [`GrayImage`] - floating-point intensity raster

pub mod component;
pub mod error;
pub mod geometry;
pub mod gray;
pub mod grid;
pub mod shape;
pub mod stroke;

pub use component::PixelComponent;
pub use error::{Error, Result};
pub use geometry::{BoundingBox, Point, distance, range_gap, range_overlap_fraction};
pub use gray::GrayImage;
pub use grid::BitGrid;
pub use shape::Shape;
pub use stroke::{Stroke, StrokeBuilder};
