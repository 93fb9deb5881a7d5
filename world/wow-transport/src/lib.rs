//! Transport paths and animation lookups for World of Warcraft servers.
//!
//! Ships, zeppelins and elevators follow fixed taxi paths in a loop. This
//! crate turns the raw path nodes of each transport into a timed keyframe
//! cycle with one spline per travelled run, and resolves which animation and
//! rotation samples apply at a given point of a transport's animation.
//!
//! # Examples
//!
//! ```
//! use glam::Vec3;
//! use wow_transport::{
//!     MemoryDataSource, TaxiPathNode, TransportConfig, TransportInfo, TransportManager,
//! };
//!
//! let mut source = MemoryDataSource::new();
//! source
//!     .add_transport(TransportInfo::new(20808, "The Bravery", 1))
//!     .add_path_nodes([
//!         TaxiPathNode::new(1, 0, 0, Vec3::ZERO),
//!         TaxiPathNode::new(1, 1, 0, Vec3::new(0.0, 0.0, 50.0)).with_stop(3000),
//!         TaxiPathNode::new(1, 2, 0, Vec3::new(0.0, 0.0, 100.0)),
//!     ]);
//!
//! let manager = TransportManager::from_source(TransportConfig::default(), &source)?;
//! let template = manager.transport_template(20808).expect("generated");
//! assert_eq!(template.key_frames.len(), 3);
//! assert_eq!(template.splines.len(), 2);
//! # Ok::<(), wow_transport::TransportError>(())
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod animation;
pub mod builder;
pub mod config;
pub mod error;
pub mod keyframe;
pub mod manager;
pub mod motion;
pub mod records;
pub mod source;
pub mod spline;
pub mod template;

pub use animation::{SampleTable, TimedSample, TransportAnimation, TransportAnimationContainer};
pub use builder::generate_waypoints;
pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use keyframe::{KeyFrame, KeyFrameVec};
pub use manager::{ManagerGuard, SharedTransportManager, TransportManager};
pub use motion::VelocityProfile;
pub use records::{
    MapEntry, PathNodeFlags, TaxiPathNode, TransportAnimationEntry, TransportInfo,
    TransportRotationEntry,
};
pub use source::{MemoryDataSource, TransportDataSource};
pub use spline::{SplineId, TransportSpline};
pub use template::{LoadSummary, RunSpline, TransportTemplate, TransportTemplateStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
