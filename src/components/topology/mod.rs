//! Hierarchical DAS topology viewer.
//!
//! Data flows one way: [`TopologyGraph`] (validated nodes, links and their
//! adjacency index) feeds the [`Layout`] and [`Visibility`] engines, which the
//! [`TopologyState`] controller caches and recomputes as the user collapses
//! subtrees or changes filters. [`scene::build`] turns the controller into a
//! backend-agnostic [`scene::Scene`] that the canvas renderer draws.

mod adjacency;
mod builder;
mod component;
mod config;
#[cfg(test)]
mod fixtures;
mod graph;
mod inventory;
mod layout;
mod render;
pub mod scene;
mod state;
mod types;
mod visibility;

pub use adjacency::Adjacency;
pub use builder::TopologyBuilder;
pub use component::TopologyCanvas;
pub use config::ViewConfig;
pub use graph::{GraphError, TopologyGraph};
pub use inventory::{InventoryRow, inventory_rows, inventory_status};
pub use layout::{Layout, Point};
pub use state::{HoverState, PanState, TopologyState, Viewport};
pub use types::{
	DeviceType, NodeAttributes, PowerClass, Status, Tier, TopologyData, TopologyLink, TopologyNode,
	TypeMeta,
};
pub use visibility::{Criterion, NodeFilter, Visibility, descendants, hidden_set};
