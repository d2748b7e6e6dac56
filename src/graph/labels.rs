//! Edge labels and colour tags
//!
//! Labels depend only on the message collection. The table is fixed.

use crate::resources::MessageKind;

pub const ROUTES_TO: &str = "routes to";
pub const PUBLISHES_AND_SUBSCRIBES: &str = "publishes and subscribes";
pub const WRITES_TO: &str = "writes to";
pub const READS_FROM: &str = "reads from";
pub const READS_AND_WRITES: &str = "reads from \n and writes to";

/// Label on the edge from a producer to the message
pub fn producer_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Command => "invokes",
        MessageKind::Event => "publishes \nevent",
        MessageKind::Query => "requests",
    }
}

/// Label on the edge from the message (or its channel) to a consumer
pub fn consumer_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Command => "accepts",
        MessageKind::Event => "subscribed by",
        MessageKind::Query => "accepts",
    }
}

/// Colour tag carried by edges that transport a message of this kind
pub fn message_color(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Event => "orange",
        MessageKind::Command => "blue",
        MessageKind::Query => "green",
    }
}
