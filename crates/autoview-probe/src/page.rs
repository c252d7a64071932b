//! # Target Document Model
//!
//! An arena-backed model of the embedded page's DOM, as seen from inside
//! the target execution context. The probe, the framework adapters, and
//! the component locator all operate against this model.
//!
//! The arena keeps elements in creation order (which is document order for
//! a parsed page), so bounded descendant scans and selector queries behave
//! like their DOM equivalents.
//!
//! ## Key Types
//!
//! - [`ElementId`] — Arena index for one element
//! - [`Element`] — Tag, attributes, classes, bounds, expando properties
//! - [`Document`] — The tree plus selector/xpath query evaluation

use std::collections::BTreeMap;

use autoview_core::Rect;

use crate::value::JsValue;

/// Arena index of an element within a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) usize);

/// One element of the target page.
///
/// `properties` models expando properties set on the DOM node by framework
/// runtimes (e.g. the per-element internal-instance reference keys React
/// writes), as opposed to `attributes` which are the markup attributes.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    class_list: Vec<String>,
    bounds: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    properties: BTreeMap<String, JsValue>,
}

impl Element {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            class_list: Vec::new(),
            bounds: Rect::zero(),
            parent,
            children: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes
            .get("id")
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn class_list(&self) -> &[String] {
        &self.class_list
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list.iter().any(|c| c == class)
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn property(&self, key: &str) -> Option<&JsValue> {
        self.properties.get(key)
    }

    /// Iterate expando property names, in sorted order.
    pub fn property_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

/// The target page's DOM tree.
///
/// Construction always yields an `html` root with a `body` child; all
/// application elements hang off `body`. XPath generation terminates at
/// `body`, matching how the probe addresses elements.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    html: ElementId,
    body: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let html = Element::new("html", None);
        let mut body = Element::new("body", Some(ElementId(0)));
        body.bounds = Rect::zero();
        let mut doc = Self {
            elements: vec![html, body],
            html: ElementId(0),
            body: ElementId(1),
        };
        doc.elements[0].children.push(doc.body);
        doc
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Create an element and append it under `parent`.
    pub fn append_element(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(tag, Some(parent)));
        self.element_mut(parent).children.push(id);
        id
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        self.element_mut(id)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let el = self.element_mut(id);
        if !el.class_list.iter().any(|c| c == class) {
            el.class_list.push(class.to_string());
        }
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        self.element_mut(id).bounds = bounds;
    }

    /// Set an expando property on an element (framework-runtime territory).
    pub fn set_property(&mut self, id: ElementId, key: &str, value: JsValue) {
        self.element_mut(id)
            .properties
            .insert(key.to_string(), value);
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut current = self.element(id).parent;
        while let Some(p) = current {
            out.push(p);
            current = self.element(p).parent;
        }
        out
    }

    /// Descendants of `id` in document order (pre-order), excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .element(id)
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.element(next).children.iter().rev().copied());
        }
        out
    }

    /// Whether `node` lies in the subtree rooted at `root` (inclusive).
    pub fn subtree_contains(&self, root: ElementId, node: ElementId) -> bool {
        if root == node {
            return true;
        }
        let mut current = self.element(node).parent;
        while let Some(p) = current {
            if p == root {
                return true;
            }
            current = self.element(p).parent;
        }
        false
    }

    /// All elements in document order (excluding the html root itself).
    pub fn all_elements(&self) -> Vec<ElementId> {
        let mut out = vec![self.body];
        out.extend(self.descendants(self.body));
        out
    }

    /// Find the first element with the given id attribute.
    pub fn element_by_id(&self, id_value: &str) -> Option<ElementId> {
        self.all_elements()
            .into_iter()
            .find(|&el| self.element(el).id() == Some(id_value))
    }

    /// 1-based index of `id` among its same-tag siblings.
    pub(crate) fn sibling_index(&self, id: ElementId) -> usize {
        let tag = self.element(id).tag.clone();
        let Some(parent) = self.element(id).parent else {
            return 1;
        };
        let mut index = 0;
        for &child in self.element(parent).children.iter() {
            if self.element(child).tag == tag {
                index += 1;
            }
            if child == id {
                return index;
            }
        }
        1
    }

    // ─────────────────────────────────────────────────────────
    // Query evaluation
    // ─────────────────────────────────────────────────────────

    /// Resolve an XPath of the two forms the probe produces:
    /// `//*[@id="x"]` and `/html/body/div[2]/span[1]`.
    pub fn query_xpath(&self, xpath: &str) -> Option<ElementId> {
        if let Some(rest) = xpath.strip_prefix("//*[@id=\"") {
            let id_value = rest.strip_suffix("\"]")?;
            return self.element_by_id(id_value);
        }

        let path = xpath.strip_prefix("/html")?;
        let mut current = self.html;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let (tag, index) = parse_xpath_segment(segment)?;
            let mut seen = 0;
            let mut found = None;
            for &child in self.element(current).children.iter() {
                if self.element(child).tag == tag {
                    seen += 1;
                    if seen == index {
                        found = Some(child);
                        break;
                    }
                }
            }
            current = found?;
        }
        Some(current)
    }

    /// Resolve a CSS selector of the three forms the probe produces:
    /// `#id`, `tag.class1.class2`, and bare `tag`. Returns the first match
    /// in document order.
    pub fn query_selector(&self, selector: &str) -> Option<ElementId> {
        if let Some(id_value) = selector.strip_prefix('#') {
            return self.element_by_id(id_value);
        }

        let mut parts = selector.split('.');
        let tag = parts.next()?.to_ascii_lowercase();
        let classes: Vec<&str> = parts.collect();

        self.all_elements().into_iter().find(|&el| {
            let element = self.element(el);
            element.tag == tag && classes.iter().all(|c| element.has_class(c))
        })
    }
}

/// Parse one xpath step: `div[2]` → ("div", 2), bare `body` → ("body", 1).
fn parse_xpath_segment(segment: &str) -> Option<(String, usize)> {
    match segment.split_once('[') {
        Some((tag, rest)) => {
            let index: usize = rest.strip_suffix(']')?.parse().ok()?;
            Some((tag.to_ascii_lowercase(), index))
        }
        None => Some((segment.to_ascii_lowercase(), 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_list() -> (Document, ElementId, ElementId, ElementId) {
        // body > ul > (li, li)
        let mut doc = Document::new();
        let ul = doc.append_element(doc.body(), "ul");
        let li1 = doc.append_element(ul, "li");
        let li2 = doc.append_element(ul, "li");
        (doc, ul, li1, li2)
    }

    #[test]
    fn test_document_has_html_body_skeleton() {
        let doc = Document::new();
        assert_eq!(doc.element(doc.body()).tag(), "body");
        assert_eq!(doc.element(doc.body()).parent(), Some(ElementId(0)));
    }

    #[test]
    fn test_append_element_links_parent_and_child() {
        let (doc, ul, li1, li2) = build_list();
        assert_eq!(doc.element(li1).parent(), Some(ul));
        assert_eq!(doc.element(ul).children(), &[li1, li2]);
    }

    #[test]
    fn test_tag_lowercased() {
        let mut doc = Document::new();
        let el = doc.append_element(doc.body(), "DIV");
        assert_eq!(doc.element(el).tag(), "div");
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (doc, ul, li1, _) = build_list();
        assert_eq!(doc.ancestors(li1), vec![ul, doc.body(), ElementId(0)]);
    }

    #[test]
    fn test_descendants_document_order() {
        let (doc, ul, li1, li2) = build_list();
        assert_eq!(doc.descendants(doc.body()), vec![ul, li1, li2]);
    }

    #[test]
    fn test_subtree_contains() {
        let (doc, ul, li1, _) = build_list();
        assert!(doc.subtree_contains(ul, li1));
        assert!(doc.subtree_contains(ul, ul));
        assert!(!doc.subtree_contains(li1, ul));
    }

    #[test]
    fn test_element_by_id() {
        let (mut doc, _, li1, _) = build_list();
        doc.set_attribute(li1, "id", "first");
        assert_eq!(doc.element_by_id("first"), Some(li1));
        assert_eq!(doc.element_by_id("missing"), None);
    }

    #[test]
    fn test_sibling_index_counts_same_tag_only() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.body(), "div");
        let _span = doc.append_element(doc.body(), "span");
        let div2 = doc.append_element(doc.body(), "div");
        assert_eq!(doc.sibling_index(div), 1);
        assert_eq!(doc.sibling_index(div2), 2);
    }

    #[test]
    fn test_query_xpath_positional() {
        let (doc, _, _, li2) = build_list();
        assert_eq!(doc.query_xpath("/html/body/ul[1]/li[2]"), Some(li2));
        assert_eq!(doc.query_xpath("/html/body/ul[1]/li[3]"), None);
    }

    #[test]
    fn test_query_xpath_by_id() {
        let (mut doc, _, li1, _) = build_list();
        doc.set_attribute(li1, "id", "row");
        assert_eq!(doc.query_xpath("//*[@id=\"row\"]"), Some(li1));
    }

    #[test]
    fn test_query_selector_forms() {
        let (mut doc, ul, li1, _) = build_list();
        doc.set_attribute(ul, "id", "list");
        doc.add_class(li1, "item");
        doc.add_class(li1, "active");

        assert_eq!(doc.query_selector("#list"), Some(ul));
        assert_eq!(doc.query_selector("li.item.active"), Some(li1));
        assert_eq!(doc.query_selector("ul"), Some(ul));
        assert_eq!(doc.query_selector("li.missing"), None);
    }

    #[test]
    fn test_properties_are_separate_from_attributes() {
        let (mut doc, _, li1, _) = build_list();
        doc.set_property(li1, "__reactFiber$abc", JsValue::from(7));
        assert!(doc.element(li1).property("__reactFiber$abc").is_some());
        assert!(doc.element(li1).attribute("__reactFiber$abc").is_none());
        assert_eq!(
            doc.element(li1).property_keys().collect::<Vec<_>>(),
            vec!["__reactFiber$abc"]
        );
    }
}
