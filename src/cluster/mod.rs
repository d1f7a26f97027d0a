//! Local cluster lifecycle
//!
//! - `topology`: built-in and user-supplied kind node layouts
//! - `provider`: kind CLI wrapper and node runtime selection
//! - `images`: preloading local images onto cluster nodes

pub mod images;
pub mod provider;
pub mod topology;

pub use images::load_images;
pub use provider::{ClusterProvider, KindProvider, NodeRuntime};
pub use topology::{resolve_topology, InstallType};
