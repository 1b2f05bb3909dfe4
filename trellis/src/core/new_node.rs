// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::rc::Rc;

use crate::core::{BuildError, Node};
use crate::style::Style;

/// Per-instance options that are not style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeOptions {
    /// Disabled nodes and their descendants receive no input and are drawn translucent.
    pub disabled: bool,
    /// Overrides [`Node::is_interactive`].
    pub interactive: Option<bool>,
}

/// A node descriptor that has not entered the tree yet.
///
/// This is what application code builds: a node value plus its authored style, options,
/// raw contents and navigation item. Reconciliation either mounts it or uses it to update
/// an existing instance with the same identity path.
pub struct NewNode {
    pub(crate) node: Box<dyn Node>,
    pub(crate) style: Style,
    pub(crate) options: NodeOptions,
    pub(crate) contents: Vec<Content>,
    pub(crate) item: Option<Box<NewNode>>,
}

impl NewNode {
    /// Wrap a node value with default style and options.
    pub fn new(node: impl Node) -> Self {
        Self::from_box(Box::new(node))
    }

    /// Wrap a boxed node value.
    pub fn from_box(node: Box<dyn Node>) -> Self {
        Self {
            node,
            style: Style::default(),
            options: NodeOptions::default(),
            contents: Vec::new(),
            item: None,
        }
    }

    /// The node value.
    pub fn node(&self) -> &dyn Node {
        &*self.node
    }

    /// Downcast the node value.
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.node.downcast_ref()
    }

    /// Short type name of the node value.
    pub fn short_type_name(&self) -> &'static str {
        self.node.short_type_name()
    }

    /// The authored style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Mutable access to the authored style.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// The instance options.
    pub fn options(&self) -> &NodeOptions {
        &self.options
    }

    /// The raw, unexpanded contents.
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// How this node is represented in navigation views such as
    /// [`TabView`](crate::nodes::TabView).
    pub fn nav_item(&self) -> Option<&Self> {
        self.item.as_deref()
    }
}

impl Clone for NewNode {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone_box(),
            style: self.style.clone(),
            options: self.options.clone(),
            contents: self.contents.clone(),
            item: self.item.clone(),
        }
    }
}

impl fmt::Debug for NewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewNode")
            .field("type", &self.short_type_name())
            .field("contents", &self.contents.len())
            .finish_non_exhaustive()
    }
}

impl<N: Node> From<N> for NewNode {
    fn from(node: N) -> Self {
        Self::new(node)
    }
}

type Builder = Rc<dyn Fn() -> Result<Vec<NewNode>, BuildError>>;

/// Control-flow content expanding a collection into zero or more child descriptors.
///
/// The builder runs every time the owning node is rebuilt, so it may read state cells
/// captured at construction.
#[derive(Clone)]
pub struct ForEach {
    builder: Builder,
}

impl ForEach {
    /// One child per item.
    pub fn new<T, N>(items: impl IntoIterator<Item = T>, builder: impl Fn(&T) -> N + 'static) -> Self
    where
        T: 'static,
        N: Into<NewNode>,
    {
        let items: Vec<T> = items.into_iter().collect();
        Self {
            builder: Rc::new(move || Ok(items.iter().map(|item| builder(item).into()).collect())),
        }
    }

    /// One child per item, with the item's index.
    pub fn indexed<T, N>(
        items: impl IntoIterator<Item = T>,
        builder: impl Fn(usize, &T) -> N + 'static,
    ) -> Self
    where
        T: 'static,
        N: Into<NewNode>,
    {
        let items: Vec<T> = items.into_iter().collect();
        Self {
            builder: Rc::new(move || {
                Ok(items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| builder(index, item).into())
                    .collect())
            }),
        }
    }

    /// One child per item, with a builder that may fail.
    ///
    /// A failure aborts the rebuild of the owning node with [`BuildError::Builder`].
    pub fn try_new<T, N, E>(
        items: impl IntoIterator<Item = T>,
        builder: impl Fn(&T) -> Result<N, E> + 'static,
    ) -> Self
    where
        T: 'static,
        N: Into<NewNode>,
        E: fmt::Display,
    {
        let items: Vec<T> = items.into_iter().collect();
        Self {
            builder: Rc::new(move || {
                items
                    .iter()
                    .map(|item| {
                        builder(item)
                            .map(Into::into)
                            .map_err(|err| BuildError::Builder {
                                type_name: "ForEach",
                                message: err.to_string(),
                            })
                    })
                    .collect()
            }),
        }
    }

    /// Children computed from scratch every rebuild.
    pub fn dynamic<N: Into<NewNode>>(builder: impl Fn() -> Vec<N> + 'static) -> Self {
        Self {
            builder: Rc::new(move || Ok(builder().into_iter().map(Into::into).collect())),
        }
    }

    /// Run the builder.
    pub fn expand(&self) -> Result<Vec<NewNode>, BuildError> {
        (self.builder)()
    }
}

impl fmt::Debug for ForEach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ForEach")
    }
}

/// One entry of a node's raw contents.
#[derive(Clone, Debug)]
pub enum Content {
    /// A single child.
    Node(NewNode),
    /// A dynamic run of children.
    ForEach(ForEach),
}

impl From<NewNode> for Content {
    fn from(node: NewNode) -> Self {
        Self::Node(node)
    }
}

impl From<ForEach> for Content {
    fn from(each: ForEach) -> Self {
        Self::ForEach(each)
    }
}

/// Expand raw contents into child descriptors, in order.
pub fn expand_contents(contents: &[Content]) -> Result<Vec<NewNode>, BuildError> {
    let mut children = Vec::with_capacity(contents.len());
    for content in contents {
        match content {
            Content::Node(node) => children.push(node.clone()),
            Content::ForEach(each) => children.extend(each.expand()?),
        }
    }
    Ok(children)
}

/// Composition methods available on every node descriptor.
pub trait NodeExt: Into<NewNode> {
    /// Append a child.
    fn with_child(self, child: impl Into<NewNode>) -> NewNode {
        let mut node = self.into();
        node.contents.push(Content::Node(child.into()));
        node
    }

    /// Append several children.
    fn with_children<N: Into<NewNode>>(self, children: impl IntoIterator<Item = N>) -> NewNode {
        let mut node = self.into();
        node.contents
            .extend(children.into_iter().map(|child| Content::Node(child.into())));
        node
    }

    /// Append a dynamic run of children.
    fn with_each(self, each: ForEach) -> NewNode {
        let mut node = self.into();
        node.contents.push(Content::ForEach(each));
        node
    }

    /// Disable the node and its descendants. Also multiplies the opacity by 0.25.
    fn disabled(self, disabled: bool) -> NewNode {
        let mut node = self.into();
        node.options.disabled = disabled;
        node
    }

    /// Override whether the node is interactive.
    fn interactive(self, interactive: bool) -> NewNode {
        let mut node = self.into();
        node.options.interactive = Some(interactive);
        node
    }

    /// Set how the node is represented in navigation views.
    fn item(self, item: impl Into<NewNode>) -> NewNode {
        let mut node = self.into();
        node.item = Some(Box::new(item.into()));
        node
    }
}

impl<T: Into<NewNode>> NodeExt for T {}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::nodes::{Group, Text};

    #[test]
    fn contents_expand_in_order() {
        let node = Group::new()
            .with_child(Text::new("first"))
            .with_each(ForEach::new(["a", "b"], |s| Text::new(*s)))
            .with_child(Text::new("last"));
        let children = expand_contents(node.contents()).unwrap();
        let texts: Vec<_> = children
            .iter()
            .map(|child| child.downcast_ref::<Text>().unwrap().text().to_string())
            .collect();
        assert_eq!(texts, ["first", "a", "b", "last"]);
    }

    #[test]
    fn failing_builder_is_a_construction_error() {
        let each = ForEach::try_new([1, 2, 3], |n| {
            if *n == 2 {
                Err("two is not allowed")
            } else {
                Ok(Text::new(n.to_string()))
            }
        });
        assert_matches!(
            each.expand(),
            Err(BuildError::Builder { type_name: "ForEach", message }) if message == "two is not allowed"
        );
    }

    #[test]
    fn indexed_builder_sees_indices() {
        let each = ForEach::indexed(["x", "y"], |i, s| Text::new(format!("{i}{s}")));
        let children = each.expand().unwrap();
        assert_eq!(children[1].downcast_ref::<Text>().unwrap().text(), "1y");
    }
}
