//! Geometry engine: maps display-space requests onto the raw raster.
//!
//! Every function here is pure. Given the raw raster size, the EXIF
//! rotation and the caller's parameters, it produces a [`TransformPlan`]
//! that any [`Codec`](crate::codec::Codec) can execute.
//!
//! # Coordinate System
//!
//! - Requests are expressed in display space, i.e. after EXIF correction
//! - Plans are expressed in raw space, i.e. the raster as decoded
//! - Rotation angles are in degrees, positive = clockwise
//! - Origin is the top-left corner
//!
//! # Execution Order
//!
//! A plan is always applied to the raw raster as crop, then scale, then
//! rotate. Rotating last by the EXIF angle is what turns the raw result
//! into the display-space result the caller asked for.

mod bounds;
mod plan;
mod types;

pub use bounds::{fit_to_max, fit_within, rotated_bounds};
pub use plan::{plan_crop, plan_resize, plan_resize_to_max, plan_rotate, TransformPlan};
pub use types::{Rect, Rotation, Size};
