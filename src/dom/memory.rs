use super::{Dom, DomEffect, ElementRef, ObserverKind, ScrollBehavior};
use scraper::{Html, Selector};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Carries the arena index of every element into the parsed markup.
const NODE_INDEX_ATTRIBUTE: &str = "data-in-memory-node";

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A selector `scraper` could not parse.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("`{selector}` is not a valid CSS selector: {reason}")]
pub struct InvalidSelector {
    pub selector: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    parent: Option<ElementRef>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    offset_top: f64,
    offset_height: f64,
}

impl Node {
    fn set_attribute(&mut self, name: &str, value: String) {
        if name == "class" {
            self.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            self.attributes.insert(name.to_string(), value);
        }
    }
}

/// Describes a node before it is appended to an `InMemoryDom`.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn new(tag: &str) -> Self {
        Self {
            node: Node {
                tag: tag.to_ascii_lowercase(),
                ..Node::default()
            },
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.node.classes.insert(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.node.set_attribute(name, value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.node.text = text.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.node.value = value.to_string();
        self
    }

    /// Layout box as reported by `offsetTop` / `offsetHeight`.
    pub fn layout(mut self, top: f64, height: f64) -> Self {
        self.node.offset_top = top;
        self.node.offset_height = height;
        self
    }
}

/// A page held entirely in memory.
///
/// It starts with an `html` root and a `body`; everything else is appended by the host. Effects are
/// applied the way a browser would apply them, and a few extra accessors (`style`, `is_disabled`,
/// `is_observed`, `scroll_requests`) expose what a real document would only show visually.
///
/// Selectors are full CSS selectors, parsed and matched by `scraper` against the page rendered as
/// markup. The markup is rebuilt lazily after any change to the tree, its classes or attributes.
/// The tree should be one the HTML parser keeps as is (no block inside a `<p>`, no children under
/// void elements); anything it would move around is matched where the parser put it.
#[derive(Debug, Clone)]
pub struct InMemoryDom {
    nodes: Vec<Node>,
    scroll_y: f64,
    focused: Option<ElementRef>,
    observed: HashSet<(ObserverKind, ElementRef)>,
    scroll_requests: Vec<(f64, ScrollBehavior)>,
    markup: RefCell<Option<Html>>,
}

impl Default for InMemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: vec![],
            scroll_y: 0.0,
            focused: None,
            observed: HashSet::new(),
            scroll_requests: vec![],
            markup: RefCell::new(None),
        };
        let root = dom.push(None, NodeBuilder::new("html"));
        dom.push(Some(root), NodeBuilder::new("body"));
        dom
    }

    pub fn root(&self) -> ElementRef {
        ElementRef::new(0)
    }

    pub fn body(&self) -> ElementRef {
        ElementRef::new(1)
    }

    pub fn append(&mut self, parent: ElementRef, node: NodeBuilder) -> ElementRef {
        self.push(Some(parent), node)
    }

    fn push(&mut self, parent: Option<ElementRef>, node: NodeBuilder) -> ElementRef {
        let mut node = node.node;
        node.parent = parent;
        self.nodes.push(node);
        self.invalidate_markup();
        ElementRef::new(self.nodes.len() - 1)
    }

    /// Simulates the user scrolling the window.
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    /// Simulates the user typing into a form control.
    pub fn set_value(&mut self, element: ElementRef, value: &str) {
        if let Some(node) = self.nodes.get_mut(element.index()) {
            node.value = value.to_string();
        }
    }

    /// Simulates keyboard focus moving to `element`.
    pub fn focus(&mut self, element: ElementRef) {
        self.focused = Some(element);
    }

    pub fn style(&self, element: ElementRef, property: &str) -> Option<String> {
        self.node(element)
            .and_then(|node| node.styles.get(property).cloned())
    }

    pub fn is_disabled(&self, element: ElementRef) -> bool {
        self.node(element).map_or(false, |node| node.disabled)
    }

    pub fn is_observed(&self, observer: ObserverKind, element: ElementRef) -> bool {
        self.observed.contains(&(observer, element))
    }

    /// Every `ScrollTo` applied so far, oldest first.
    pub fn scroll_requests(&self) -> &[(f64, ScrollBehavior)] {
        &self.scroll_requests
    }

    fn node(&self, element: ElementRef) -> Option<&Node> {
        self.nodes.get(element.index())
    }

    fn node_mut(&mut self, element: ElementRef) -> Option<&mut Node> {
        self.nodes.get_mut(element.index())
    }

    /// Every element matching `selector`, in document order.
    pub fn try_select_all(&self, selector: &str) -> Result<Vec<ElementRef>, InvalidSelector> {
        let parsed = parse_selector(selector)?;
        Ok(self.with_markup(|html| html.select(&parsed).filter_map(node_index).collect()))
    }

    /// `element` itself or its nearest ancestor matching `selector`.
    pub fn try_closest(
        &self,
        element: ElementRef,
        selector: &str,
    ) -> Result<Option<ElementRef>, InvalidSelector> {
        let parsed = parse_selector(selector)?;
        Ok(self.with_markup(|html| {
            let start = find_element(html, element)?;
            std::iter::successors(Some(start), |current| {
                current.parent().and_then(scraper::ElementRef::wrap)
            })
            .find(|candidate| parsed.matches(candidate))
            .and_then(node_index)
        }))
    }

    fn with_markup<R>(&self, f: impl FnOnce(&Html) -> R) -> R {
        let mut markup = self.markup.borrow_mut();
        let html = markup.get_or_insert_with(|| Html::parse_document(&self.render_markup()));
        f(html)
    }

    fn invalidate_markup(&mut self) {
        *self.markup.get_mut() = None;
    }

    fn render_markup(&self) -> String {
        let mut markup = String::from("<!DOCTYPE html>");
        self.render_element(self.root(), &mut markup);
        markup
    }

    fn render_element(&self, element: ElementRef, markup: &mut String) {
        let node = match self.node(element) {
            Some(node) => node,
            None => return,
        };
        markup.push('<');
        markup.push_str(&node.tag);
        push_attribute(markup, NODE_INDEX_ATTRIBUTE, &element.index().to_string());
        if !node.classes.is_empty() {
            let classes: Vec<&str> = node.classes.iter().map(String::as_str).collect();
            push_attribute(markup, "class", &classes.join(" "));
        }
        for (name, value) in &node.attributes {
            push_attribute(markup, name, value);
        }
        markup.push('>');

        // Siblings are stored in the order they were appended.
        for (index, child) in self.nodes.iter().enumerate() {
            if child.parent == Some(element) {
                self.render_element(ElementRef::new(index), markup);
            }
        }

        if !VOID_ELEMENTS.contains(&node.tag.as_str()) {
            markup.push_str("</");
            markup.push_str(&node.tag);
            markup.push('>');
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, InvalidSelector> {
    Selector::parse(selector).map_err(|e| InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

fn push_attribute(markup: &mut String, name: &str, value: &str) {
    markup.push(' ');
    markup.push_str(name);
    markup.push_str("=\"");
    markup.push_str(&htmlescape::encode_attribute(value));
    markup.push('"');
}

fn node_index(element: scraper::ElementRef<'_>) -> Option<ElementRef> {
    element
        .value()
        .attr(NODE_INDEX_ATTRIBUTE)?
        .parse()
        .ok()
        .map(ElementRef::new)
}

fn find_element(html: &Html, element: ElementRef) -> Option<scraper::ElementRef<'_>> {
    let selector =
        Selector::parse(&format!("[{NODE_INDEX_ATTRIBUTE}=\"{}\"]", element.index())).ok()?;
    html.select(&selector).next()
}

fn warn_invalid(error: &InvalidSelector) {
    tracing::warn!(error.message = %error, "Ignoring an invalid selector");
}

impl Dom for InMemoryDom {
    fn select_all(&self, selector: &str) -> Vec<ElementRef> {
        self.try_select_all(selector).unwrap_or_else(|e| {
            warn_invalid(&e);
            vec![]
        })
    }

    fn select_all_within(&self, scope: ElementRef, selector: &str) -> Vec<ElementRef> {
        self.select_all(selector)
            .into_iter()
            .filter(|element| *element != scope && self.contains(scope, *element))
            .collect()
    }

    fn closest(&self, element: ElementRef, selector: &str) -> Option<ElementRef> {
        self.try_closest(element, selector).unwrap_or_else(|e| {
            warn_invalid(&e);
            None
        })
    }

    fn contains(&self, ancestor: ElementRef, node: ElementRef) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.node(candidate).and_then(|node| node.parent);
        }
        false
    }

    fn attribute(&self, element: ElementRef, name: &str) -> Option<String> {
        self.node(element)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    fn has_class(&self, element: ElementRef, class: &str) -> bool {
        self.node(element)
            .map_or(false, |node| node.classes.contains(class))
    }

    fn text(&self, element: ElementRef) -> String {
        self.node(element)
            .map(|node| node.text.clone())
            .unwrap_or_default()
    }

    fn value(&self, element: ElementRef) -> String {
        self.node(element)
            .map(|node| node.value.clone())
            .unwrap_or_default()
    }

    fn offset_top(&self, element: ElementRef) -> f64 {
        self.node(element).map_or(0.0, |node| node.offset_top)
    }

    fn offset_height(&self, element: ElementRef) -> f64 {
        self.node(element).map_or(0.0, |node| node.offset_height)
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn active_element(&self) -> Option<ElementRef> {
        self.focused
    }

    fn apply(&mut self, effect: DomEffect) {
        match effect {
            DomEffect::AddClass { target, class } => {
                if let Some(node) = self.node_mut(target) {
                    node.classes.insert(class.to_string());
                }
                self.invalidate_markup();
            }
            DomEffect::RemoveClass { target, class } => {
                if let Some(node) = self.node_mut(target) {
                    node.classes.remove(class);
                }
                self.invalidate_markup();
            }
            DomEffect::SetAttribute {
                target,
                name,
                value,
            } => {
                if let Some(node) = self.node_mut(target) {
                    node.set_attribute(name, value);
                }
                self.invalidate_markup();
            }
            DomEffect::RemoveAttribute { target, name } => {
                if let Some(node) = self.node_mut(target) {
                    if name == "class" {
                        node.classes.clear();
                    } else {
                        node.attributes.remove(name);
                    }
                }
                self.invalidate_markup();
            }
            DomEffect::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(node) = self.node_mut(target) {
                    if value.is_empty() {
                        node.styles.remove(property);
                    } else {
                        node.styles.insert(property.to_string(), value);
                    }
                }
            }
            DomEffect::SetText { target, text } => {
                if let Some(node) = self.node_mut(target) {
                    node.text = text;
                }
            }
            DomEffect::SetValue { target, value } => {
                if let Some(node) = self.node_mut(target) {
                    node.value = value;
                }
            }
            DomEffect::SetDisabled { target, disabled } => {
                if let Some(node) = self.node_mut(target) {
                    node.disabled = disabled;
                }
            }
            DomEffect::Focus { target } => self.focused = Some(target),
            DomEffect::ScrollTo { top, behavior } => {
                self.scroll_y = top.max(0.0);
                self.scroll_requests.push((top, behavior));
            }
            DomEffect::Observe { observer, target } => {
                self.observed.insert((observer, target));
            }
            DomEffect::Unobserve { observer, target } => {
                self.observed.remove(&(observer, target));
            }
        }
    }
}
