use std::fmt;
use std::error::Error;

/// Represents errors that can occur while building or configuring a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Indicates a region with zero (or negative) extent along `dimension`.
    DegenerateRegion { dimension: usize },
    /// Indicates a NaN or infinite coordinate where a finite one is required.
    NonFiniteCoordinate,
    /// Indicates that a region was requested over an empty set of points.
    EmptyInput,
    /// Indicates an element whose position lies outside the root region.
    OutOfBounds { element: usize },
    /// Indicates an element index past the end of the element slice.
    UnknownElement { element: usize },
    /// Indicates an element inserted into the same tree twice.
    DuplicateElement { element: usize },
    /// Indicates a leaf capacity of zero.
    InvalidCapacity,
    /// Indicates a negative or non-finite opening angle.
    InvalidTheta,
    /// Indicates a negative or non-finite domain padding.
    InvalidPadding,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TreeError::DegenerateRegion { dimension } => {
                write!(f, "Degenerate region: zero extent in dimension {}", dimension)
            }
            TreeError::NonFiniteCoordinate => write!(f, "Coordinate is not finite"),
            TreeError::EmptyInput => write!(f, "Cannot bound an empty set of points"),
            TreeError::OutOfBounds { element } => {
                write!(f, "Element {} lies outside the root region", element)
            }
            TreeError::UnknownElement { element } => write!(f, "Unknown element {}", element),
            TreeError::DuplicateElement { element } => {
                write!(f, "Element {} was already inserted", element)
            }
            TreeError::InvalidCapacity => write!(f, "Leaf capacity must be at least 1"),
            TreeError::InvalidTheta => write!(f, "Opening angle must be finite and non-negative"),
            TreeError::InvalidPadding => write!(f, "Domain padding must be finite and non-negative"),
        }
    }
}

impl Error for TreeError {}
