//! Custom tag extension point
//!
//! Tags the decoder does not recognise are offered, in order, to a list of
//! caller-supplied [`CustomTagDecoder`]s. The first decoder whose tag name
//! prefixes the line consumes it and returns a [`CustomTag`] value that is
//! stored either on the playlist or on the next segment.

use std::fmt;
use std::sync::Arc;

use crate::error::CustomTagError;

/// Where a decoded custom tag is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    Playlist,
    Segment,
}

/// A decoded custom tag value that knows how to render itself
pub trait CustomTag: fmt::Debug + Send + Sync {
    /// Literal tag prefix including the leading `#` and, if the tag carries
    /// a value, the trailing `:`
    fn tag_name(&self) -> &str;

    /// Full output line without the newline; `None` writes nothing
    fn encode(&self) -> Option<String>;
}

/// Decoder half of a custom tag plugin
pub trait CustomTagDecoder: Send + Sync {
    fn tag_name(&self) -> &str;

    fn scope(&self) -> TagScope;

    /// Decode the whole matched line, prefix included
    fn decode(&self, line: &str) -> Result<Arc<dyn CustomTag>, CustomTagError>;

    /// `None` when the line is not for this decoder
    fn try_decode(&self, line: &str) -> Option<Result<Arc<dyn CustomTag>, CustomTagError>> {
        if line.starts_with(self.tag_name()) {
            Some(self.decode(line))
        } else {
            None
        }
    }
}

/// Custom tags keyed by tag name; a later tag with the same name replaces
/// the earlier one
pub type CustomTags = std::collections::BTreeMap<String, Arc<dyn CustomTag>>;

pub(crate) fn write_custom_tags(out: &mut String, tags: &CustomTags) {
    for tag in tags.values() {
        if let Some(line) = tag.encode() {
            if !line.is_empty() {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
}
