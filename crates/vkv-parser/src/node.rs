//! KeyValues tree data model.
//!
//! A [`Node`] is one key bound to either a string value or an ordered block
//! of child nodes keyed by name. Nodes are built through [`NodeBuilder`],
//! which validates the staged fields before freezing them, and serialize
//! back to the indented on-disk form.

use std::fmt;

use indexmap::IndexMap;

use crate::ValidationError;

/// One indentation level in serialized output.
const INDENT: &str = "  ";

/// A validated, immutable KeyValues node.
///
/// Exactly one of `value` / `children` is present and the key is non-empty;
/// [`NodeBuilder::build`] refuses to produce anything else. Children iterate
/// in insertion order, which serialization preserves.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key: String,
    value: Option<String>,
    children: Option<IndexMap<String, Node>>,
}

impl Node {
    /// Start building a node.
    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> Option<&IndexMap<String, Node>> {
        self.children.as_ref()
    }

    /// Re-check the construction invariant on an existing node.
    ///
    /// Builder-produced nodes always pass; serialization still calls this on
    /// every node it visits before emitting it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.is_empty() {
            return Err(ValidationError {
                message: "nodes must have a key".into(),
            });
        }
        if self.value.is_none() && self.children.is_none() {
            return Err(ValidationError {
                message: format!(
                    "either the value or children must be set (key: {})",
                    self.key
                ),
            });
        }
        if self.value.is_some() && self.children.is_some() {
            return Err(ValidationError {
                message: format!(
                    "either the value or children must be set, but not both (key: {})",
                    self.key
                ),
            });
        }
        Ok(())
    }

    /// Serialize this node and its subtree to canonical indented text.
    ///
    /// A leaf emits `"<key>" "<value>"` on one line; a block emits
    /// `"<key>" {`, its children indented one level deeper, and a closing
    /// `}`. Children appear in insertion order.
    pub fn serialize(&self) -> Result<String, ValidationError> {
        let mut out = String::new();
        self.serialize_into(0, &mut out)?;
        Ok(out)
    }

    fn serialize_into(&self, depth: usize, out: &mut String) -> Result<(), ValidationError> {
        self.validate()?;

        let indentation = INDENT.repeat(depth);
        out.push_str(&indentation);
        out.push('"');
        out.push_str(&self.key);
        out.push('"');

        if let Some(value) = &self.value {
            // Values are written verbatim; embedded quotes are not re-escaped.
            out.push_str(" \"");
            out.push_str(value);
            out.push_str("\"\n");
            return Ok(());
        }

        out.push_str(" {\n");
        if let Some(children) = &self.children {
            for child in children.values() {
                child.serialize_into(depth + 1, out)?;
            }
        }
        out.push_str(&indentation);
        out.push_str("}\n");
        Ok(())
    }
}

impl fmt::Display for Node {
    /// The serialized form, or the empty string if serialization fails.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize().unwrap_or_default())
    }
}

/// Two-phase builder for [`Node`]: stage fields, then validate and freeze
/// with [`build`](NodeBuilder::build).
///
/// The builder starts empty. Staging a value and staging children are
/// mutually exclusive endpoints; `build` rejects a builder that reaches
/// neither or both.
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    key: Option<String>,
    value: Option<String>,
    children: Option<IndexMap<String, Node>>,
}

impl NodeBuilder {
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Switch into block mode with an empty child map, discarding any
    /// staged value.
    pub fn start_child_block(mut self) -> Self {
        self.value = None;
        self.children = Some(IndexMap::new());
        self
    }

    /// Add a child under its own key, or do nothing if
    /// [`start_child_block`](Self::start_child_block) has not been called.
    ///
    /// Re-adding a key replaces the earlier child and moves the entry to the
    /// latest insertion position.
    pub fn add_child(mut self, child: Node) -> Self {
        if let Some(children) = self.children.as_mut() {
            children.shift_remove(child.key());
            children.insert(child.key().to_owned(), child);
        }
        self
    }

    /// Empty the child map, staying in block mode; no-op outside block mode.
    pub fn clear_children(mut self) -> Self {
        if let Some(children) = self.children.as_mut() {
            children.clear();
        }
        self
    }

    /// Drop the child map entirely, leaving block mode.
    pub fn delete_children(mut self) -> Self {
        self.children = None;
        self
    }

    /// Validate the staged fields and freeze them into a [`Node`].
    ///
    /// Fails when the key is unset or empty, when neither the value nor
    /// children are staged, or when both are. The error message includes a
    /// dump of the staged state.
    pub fn build(self) -> Result<Node, ValidationError> {
        let key = match self.key.as_deref() {
            Some(key) if !key.is_empty() => key.to_owned(),
            _ => return Err(self.invalid("nodes must have a key")),
        };
        if self.value.is_none() && self.children.is_none() {
            return Err(self.invalid("either the value or children must be set"));
        }
        if self.value.is_some() && self.children.is_some() {
            return Err(self.invalid("either the value or children must be set, but not both"));
        }

        Ok(Node {
            key,
            value: self.value,
            children: self.children,
        })
    }

    fn invalid(&self, message: &str) -> ValidationError {
        ValidationError {
            message: format!("{message}: {self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(key: &str, value: &str) -> Node {
        Node::builder().key(key).value(value).build().unwrap()
    }

    // =========================================================================
    // Building
    // =========================================================================

    #[test]
    fn test_build_leaf() {
        let node = leaf("hostname", "my server");
        assert_eq!(node.key(), "hostname");
        assert_eq!(node.value(), Some("my server"));
        assert!(node.children().is_none());
    }

    #[test]
    fn test_build_block() {
        let node = Node::builder()
            .key("settings")
            .start_child_block()
            .add_child(leaf("a", "1"))
            .add_child(leaf("b", "2"))
            .build()
            .unwrap();

        assert_eq!(node.key(), "settings");
        assert!(node.value().is_none());
        let children = node.children().unwrap();
        assert_eq!(
            children.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_build_requires_key() {
        assert!(Node::builder().value("orphan").build().is_err());
    }

    #[test]
    fn test_build_rejects_empty_key() {
        assert!(Node::builder().key("").value("v").build().is_err());
    }

    #[test]
    fn test_build_requires_value_or_children() {
        assert!(Node::builder().key("bare").build().is_err());
    }

    #[test]
    fn test_build_rejects_value_and_children() {
        // Staging a value after entering block mode sets both.
        let result = Node::builder()
            .key("both")
            .start_child_block()
            .value("v")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_error_message_includes_staged_state() {
        let error = Node::builder().value("orphan").build().unwrap_err();
        assert!(error.to_string().contains("orphan"));
    }

    // =========================================================================
    // Block mode transitions
    // =========================================================================

    #[test]
    fn test_start_child_block_discards_value() {
        let node = Node::builder()
            .key("block")
            .value("stale")
            .start_child_block()
            .build()
            .unwrap();

        assert!(node.value().is_none());
        assert_eq!(node.children().unwrap().len(), 0);
    }

    #[test]
    fn test_add_child_outside_block_mode_is_noop() {
        let node = Node::builder()
            .key("leaf")
            .value("v")
            .add_child(leaf("ignored", "x"))
            .build()
            .unwrap();

        assert!(node.children().is_none());
    }

    #[test]
    fn test_duplicate_key_takes_latest_position() {
        let node = Node::builder()
            .key("settings")
            .start_child_block()
            .add_child(leaf("a", "old"))
            .add_child(leaf("b", "2"))
            .add_child(leaf("a", "new"))
            .build()
            .unwrap();

        let children = node.children().unwrap();
        assert_eq!(
            children.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
        assert_eq!(children["a"].value(), Some("new"));
    }

    #[test]
    fn test_clear_children_stays_in_block_mode() {
        let node = Node::builder()
            .key("block")
            .start_child_block()
            .add_child(leaf("a", "1"))
            .clear_children()
            .build()
            .unwrap();

        assert_eq!(node.children().unwrap().len(), 0);
    }

    #[test]
    fn test_delete_children_leaves_block_mode() {
        // With the child map dropped and no value, there is nothing to build.
        let result = Node::builder()
            .key("block")
            .start_child_block()
            .add_child(leaf("a", "1"))
            .delete_children()
            .build();
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_validate_built_nodes() {
        assert!(leaf("k", "v").validate().is_ok());
        let block = Node::builder()
            .key("b")
            .start_child_block()
            .build()
            .unwrap();
        assert!(block.validate().is_ok());
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn test_serialize_leaf() {
        assert_eq!(leaf("key", "value").serialize().unwrap(), "\"key\" \"value\"\n");
    }

    #[test]
    fn test_serialize_block_in_insertion_order() {
        let node = Node::builder()
            .key("A key")
            .start_child_block()
            .add_child(leaf("3rd key", "another value"))
            .add_child(leaf("2nd key", "a value"))
            .build()
            .unwrap();

        assert_eq!(
            node.serialize().unwrap(),
            "\"A key\" {\n  \"3rd key\" \"another value\"\n  \"2nd key\" \"a value\"\n}\n"
        );
    }

    #[test]
    fn test_serialize_empty_block() {
        let node = Node::builder()
            .key("empty")
            .start_child_block()
            .build()
            .unwrap();
        assert_eq!(node.serialize().unwrap(), "\"empty\" {\n}\n");
    }

    #[test]
    fn test_serialize_nested_indentation() {
        let node = Node::builder()
            .key("outer")
            .start_child_block()
            .add_child(
                Node::builder()
                    .key("inner")
                    .start_child_block()
                    .add_child(leaf("k", "v"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(
            node.serialize().unwrap(),
            "\"outer\" {\n  \"inner\" {\n    \"k\" \"v\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_serialize_writes_values_verbatim() {
        // No write-side escaping: a scanner-produced value keeps its
        // backslash and re-emits unchanged.
        let node = leaf("key", r#"a\"b"#);
        assert_eq!(node.serialize().unwrap(), "\"key\" \"a\\\"b\"\n");
    }

    #[test]
    fn test_display_matches_serialize() {
        let node = leaf("key", "value");
        assert_eq!(node.to_string(), node.serialize().unwrap());
    }
}
