//! Planar instance geometry.
//!
//! Routing instances place the depot at index `0` and customers at
//! `1..=n`. [`EuclideanDistances`] turns those coordinates into the pairwise
//! distance function consumed by graph construction, the tour oracle and the
//! costly-edge branching strategy.

/// A node location in the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the Euclidean distance to `other`.
    ///
    /// # Examples
    /// ```
    /// use clubra_core::Point;
    ///
    /// let origin = Point::new(0.0, 0.0);
    /// assert_eq!(origin.distance(&Point::new(3.0, 4.0)), 5.0);
    /// ```
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// How Euclidean distances are post-processed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Rounding {
    /// Keep the exact floating-point distance.
    #[default]
    Exact,
    /// Round to the nearest integer, as most CVRP benchmark sets do.
    NearestInteger,
}

/// Pairwise distances over the depot and customers of an instance.
#[derive(Clone, Debug, PartialEq)]
pub struct EuclideanDistances {
    points: Vec<Point>,
    rounding: Rounding,
}

impl EuclideanDistances {
    /// Wraps the instance coordinates; index `0` is the depot.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            rounding: Rounding::Exact,
        }
    }

    /// Selects how distances are rounded.
    #[must_use]
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Returns the configured rounding mode.
    #[must_use]
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Returns the node coordinates, depot first.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the number of nodes, depot included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of customers, depot excluded.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Returns the distance between nodes `i` and `j`.
    ///
    /// Unknown node ids yield `f64::INFINITY`, which graph construction
    /// rejects as a non-finite weight.
    ///
    /// # Examples
    /// ```
    /// use clubra_core::{EuclideanDistances, Point, Rounding};
    ///
    /// let distances = EuclideanDistances::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)])
    ///     .with_rounding(Rounding::NearestInteger);
    /// assert_eq!(distances.distance(0, 1), 1.0);
    /// assert!(distances.distance(0, 7).is_infinite());
    /// ```
    #[must_use]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        let (Some(left), Some(right)) = (self.points.get(i), self.points.get(j)) else {
            return f64::INFINITY;
        };
        let exact = left.distance(right);
        match self.rounding {
            Rounding::Exact => exact,
            Rounding::NearestInteger => exact.round(),
        }
    }
}
