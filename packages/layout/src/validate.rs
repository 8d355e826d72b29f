use crate::block::Block;
use crate::packet::PacketMap;
use crate::theme::StoreColors;
use crate::visitor::PropVisitor;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Severity level of a layout issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueLevel {
    Error,
    Warning,
}

/// A problem found in a stored layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutIssue {
    pub level: IssueLevel,

    /// The rule that generated this issue
    pub rule: String,

    pub message: String,

    /// Offending block, if the issue is block-scoped
    pub block_id: Option<String>,
}

impl LayoutIssue {
    pub fn error(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            rule: rule.into(),
            message: message.into(),
            block_id: None,
        }
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            rule: rule.into(),
            message: message.into(),
            block_id: None,
        }
    }

    pub fn on_block(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

#[derive(Default)]
struct RefCollector {
    refs: Vec<String>,
}

impl PropVisitor for RefCollector {
    fn visit_packet_ref(&mut self, id: &str) {
        self.refs.push(id.to_string());
    }
}

fn packet_refs(block: &Block) -> Vec<String> {
    let mut collector = RefCollector::default();
    for value in block.props.values() {
        collector.visit_value(value);
    }
    collector.refs
}

/// Check a layout before publishing.
///
/// `is_known_type` decides which block types the renderer can draw; unknown
/// types only warn because the renderer skips them. When `packets` is given,
/// references to packets missing from it are reported as well.
pub fn validate_layout(
    blocks: &[Block],
    is_known_type: impl Fn(&str) -> bool,
    packets: Option<&PacketMap>,
) -> Vec<LayoutIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (index, block) in blocks.iter().enumerate() {
        if block.id.trim().is_empty() {
            issues.push(LayoutIssue::error(
                "empty-id",
                format!("Block #{} ({}) has an empty id", index, block.block_type),
            ));
        } else if !seen.insert(block.id.as_str()) {
            issues.push(
                LayoutIssue::error("duplicate-id", format!("Duplicate block id '{}'", block.id))
                    .on_block(&block.id),
            );
        }

        if !is_known_type(&block.block_type) {
            issues.push(
                LayoutIssue::warning(
                    "unknown-type",
                    format!("Unknown block type '{}' will not render", block.block_type),
                )
                .on_block(&block.id),
            );
        }

        if let Some(packets) = packets {
            for id in packet_refs(block) {
                if !packets.contains_key(&id) {
                    issues.push(
                        LayoutIssue::warning(
                            "dangling-packet",
                            format!("Content packet '{}' does not exist", id),
                        )
                        .on_block(&block.id),
                    );
                }
            }
        }
    }

    issues
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(#([0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|(rgb|rgba|hsl|hsla)\([^()]*\)|[a-zA-Z]+)$",
        )
        .expect("color pattern is valid")
    })
}

/// Check that every palette entry is a CSS color the renderer can emit
pub fn validate_colors(colors: &StoreColors) -> Vec<LayoutIssue> {
    colors
        .entries()
        .into_iter()
        .filter(|(_, value)| !color_pattern().is_match(value.trim()))
        .map(|(name, value)| {
            LayoutIssue::error("invalid-color", format!("Color '{}' has invalid value '{}'", name, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{make_packet_ref, ContentPacket};
    use serde_json::{json, Map};

    fn block(id: &str, block_type: &str) -> Block {
        Block::new(id, block_type, Map::new())
    }

    #[test]
    fn test_duplicate_and_empty_ids() {
        let blocks = vec![block("a", "Hero"), block("a", "Footer"), block(" ", "Hero")];
        let issues = validate_layout(&blocks, |_| true, None);

        let rules: Vec<_> = issues.iter().map(|i| i.rule.as_str()).collect();
        assert_eq!(rules, vec!["duplicate-id", "empty-id"]);
        assert!(issues.iter().all(LayoutIssue::is_error));
    }

    #[test]
    fn test_unknown_type_is_warning() {
        let blocks = vec![block("a", "UnknownWidget")];
        let issues = validate_layout(&blocks, |t| t == "Hero", None);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].level, IssueLevel::Warning);
        assert_eq!(issues[0].block_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_dangling_packet_reference() {
        let mut hero = block("a", "Hero");
        hero.props.insert("title".into(), make_packet_ref("p1"));
        hero.props.insert("body".into(), json!([make_packet_ref("missing")]));

        let mut packets = PacketMap::new();
        packets.insert("p1".into(), ContentPacket::new("p1", "text", "Title", json!("Hi")));

        let issues = validate_layout(&[hero], |_| true, Some(&packets));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule, "dangling-packet");
        assert!(issues[0].message.contains("missing"));
    }

    #[test]
    fn test_color_validation() {
        assert!(validate_colors(&StoreColors::default()).is_empty());

        let colors = StoreColors {
            primary: "rgb(0, 0, 0)".into(),
            accent: "#12345".into(),
            text: "red".into(),
            ..StoreColors::default()
        };
        let issues = validate_colors(&colors);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("accent"));
    }
}
