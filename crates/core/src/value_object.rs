//! Value object trait: equality by value, not identity.
//!
//! Observations and forecast points have **no identity**. Two points with the
//! same date, bounds and actual are the same point.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one (see `ForecastPoint::with_actual`).
///
/// ```ignore
/// let a = DemandObservation::new(date, Some(100.0))?;
/// let b = DemandObservation::new(date, Some(100.0))?;
/// assert_eq!(a, b);  // Equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
