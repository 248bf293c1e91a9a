//! Shipment board logic: bucket classification, overflow animation,
//! slide rotation, record sources and the load cycle that ties them together.

pub mod animator;
pub mod board;
pub mod classifier;
pub mod config;
pub mod ingest;
pub mod layout;
pub mod rotator;
pub mod source;

pub use animator::{AnimatedRegion, Animation, AnimationTuning, Axis, OverflowPolicy};
pub use board::{load_cycle, BoardSnapshot, RenderTarget};
pub use classifier::{classify, classify_at, Bucket, BucketKind, Classification};
pub use config::{load_settings, PresentationMode, Settings};
pub use rotator::{paginate, RotationHandle, SlidePage, SlideRotator};
pub use source::{source_from_location, FileRecordSource, HttpRecordSource, RecordSource};
