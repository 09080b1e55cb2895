//! Tree builder glue for the lenient HTML path.
//!
//! Engine output that quick-xml rejects is handed to html5ever, which calls
//! back into [`ArenaSink`] to build the same `ArenaDom` the XHTML reader
//! produces. Handles are plain `NodeId`s.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, LocalName, Namespace, QualName};

use super::arena::{ArenaDom, Attribute, NodeData, NodeId};

/// Owned element name handed back to the tree builder.
#[derive(Debug)]
pub struct ElementName(QualName);

impl ElemName for ElementName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// Builds an `ArenaDom` from tree builder callbacks.
///
/// `TreeSink` only hands out `&self`, so the arena sits in a `RefCell`.
#[derive(Default)]
pub struct ArenaSink {
    dom: RefCell<ArenaDom>,
    repairs: Cell<usize>,
}

impl ArenaSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn convert_attrs(attrs: Vec<Html5Attribute>) -> Vec<Attribute> {
        attrs
            .into_iter()
            .map(|attr| Attribute {
                name: attr.name,
                value: attr.value.to_string(),
            })
            .collect()
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeId;
    type Output = ArenaDom;
    type ElemName<'a>
        = ElementName
    where
        Self: 'a;

    fn finish(self) -> ArenaDom {
        let repairs = self.repairs.get();
        if repairs > 0 {
            log::debug!("html tree builder repaired {repairs} markup errors");
        }
        self.dom.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.repairs.set(self.repairs.get() + 1);
        log::trace!("html parse error: {msg}");
    }

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ElementName {
        match self.dom.borrow().get(*target).map(|node| &node.data) {
            Some(NodeData::Element { name, .. }) => ElementName(name.clone()),
            _ => ElementName(QualName::new(
                None,
                html5ever::ns!(),
                html5ever::local_name!(""),
            )),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> NodeId {
        self.dom
            .borrow_mut()
            .create_element(name, Self::convert_attrs(attrs))
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.dom.borrow_mut().create_comment(text.to_string())
    }

    // Processing instructions never reach the output; keep an empty comment
    // so the builder still gets a handle.
    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> NodeId {
        self.dom.borrow_mut().create_comment(String::new())
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(*parent, node),
            NodeOrText::AppendText(text) => dom.append_text(*parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        if self.dom.borrow().parent(*element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doctype =
            dom.create_doctype(name.to_string(), public_id.to_string(), system_id.to_string());
        let document = dom.document();
        dom.append(document, doctype);
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    // Engine output is always rendered in standards mode.
    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        };
        dom.insert_before(*sibling, node);
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        for attr in Self::convert_attrs(attrs) {
            let name = attr.name.local.to_string();
            if dom.get_attr(*target, &name).is_none() {
                dom.set_attr(*target, &name, attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        self.dom.borrow_mut().reparent_children(*node, *new_parent);
    }
}
