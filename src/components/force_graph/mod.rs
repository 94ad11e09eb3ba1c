mod component;
mod frame;
mod interaction;
mod layout;
mod loader;
mod render;
mod scale;
mod state;
mod types;
mod viewport;

pub use component::KnowledgeNetwork;
pub use types::{GraphData, GraphLink, GraphNode, LinkKind, NodeDetail, NodeKind};
