//! Error types for the regionseg core library.
//!
//! Defines the error enum exposed by the public API, its stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::segmenter::EngineState;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when building or driving a segmentation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SegmentError {
    /// A node index fell outside `0..node_count`.
    #[error("node {node} is out of range for {node_count} nodes")]
    NodeOutOfRange {
        /// The offending node index.
        node: usize,
        /// Number of nodes owned by the store.
        node_count: usize,
    },
    /// An edge weight was negative or non-finite.
    #[error("edge ({source_node}, {target_node}) has invalid weight {weight}")]
    InvalidWeight {
        /// First endpoint of the edge, as supplied.
        source_node: usize,
        /// Second endpoint of the edge, as supplied.
        target_node: usize,
        /// The rejected weight.
        weight: f64,
    },
    /// A merge or pipeline parameter was outside its accepted range.
    #[error("parameter `{name}` must be {expected} (got {value})")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Human-readable description of the accepted range.
        expected: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An operation was invoked in an engine state that does not permit it.
    #[error("`{operation}` is not allowed while the engine is {state}")]
    InvalidState {
        /// Name of the rejected operation.
        operation: &'static str,
        /// State the engine was in when the call was made.
        state: EngineState,
    },
    /// The number of volume values did not match the declared shape.
    #[error("volume shape holds {expected} values but {actual} were supplied")]
    ShapeMismatch {
        /// Value count implied by the shape.
        expected: usize,
        /// Value count actually supplied.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SegmentError`] variants.
    enum SegmentErrorCode for SegmentError {
        /// A node index fell outside `0..node_count`.
        NodeOutOfRange => NodeOutOfRange { .. } => "SEGMENT_NODE_OUT_OF_RANGE",
        /// An edge weight was negative or non-finite.
        InvalidWeight => InvalidWeight { .. } => "SEGMENT_INVALID_WEIGHT",
        /// A merge or pipeline parameter was outside its accepted range.
        InvalidParameter => InvalidParameter { .. } => "SEGMENT_INVALID_PARAMETER",
        /// An operation was invoked in the wrong engine state.
        InvalidState => InvalidState { .. } => "SEGMENT_INVALID_STATE",
        /// The number of volume values did not match the declared shape.
        ShapeMismatch => ShapeMismatch { .. } => "SEGMENT_SHAPE_MISMATCH",
    }
}

impl SegmentError {
    /// Returns `true` for errors caused by a bad argument rather than by
    /// calling an operation out of order.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::InvalidState { .. })
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SegmentError>;
