//! Node and edge identifiers
//!
//! Node ids are `<resourceId>-<version>`. Edge ids join the two node ids;
//! the special bidirectional and fallback edges carry a suffix.

/// Suffix of the extra edge added for a participant that both sends and receives
pub const BOTH_SUFFIX: &str = "-both";

/// Suffix of a fallback edge drawn where the declared route is missing
pub const WARNING_SUFFIX: &str = "-warning";

pub fn node_id(id: &str, version: &str) -> String {
    format!("{id}-{version}")
}

/// `<sourceNodeId>-<targetNodeId>`, i.e. `<sourceId>-<sourceVersion>-<targetId>-<targetVersion>`
pub fn edge_id(source_node_id: &str, target_node_id: &str) -> String {
    format!("{source_node_id}-{target_node_id}")
}

pub fn both_edge_id(source_node_id: &str, target_node_id: &str) -> String {
    format!("{}{BOTH_SUFFIX}", edge_id(source_node_id, target_node_id))
}

pub fn warning_edge_id(source_node_id: &str, target_node_id: &str) -> String {
    format!("{}{WARNING_SUFFIX}", edge_id(source_node_id, target_node_id))
}
