//! Preprocessing helpers consumed by the feature-engineering stage. All
//! functions return a new frame and hold no cross-call state.

pub mod interpolate;
pub mod temporal;

pub use interpolate::back_forward_fill;
pub use temporal::{encode_temporal_features, EncodingKind, TemporalUnit};
