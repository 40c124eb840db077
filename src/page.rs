//! In-memory document the widget mounts into, rendered to a standalone HTML file.

use crate::format::escape_html;

pub const STATUS_BAR_ID: &str = "status-bar";
pub const TICKER_ID: &str = "crypto-ticker";
pub const TICKER_CONTENT_ID: &str = "crypto-ticker-content";

const STYLESHEET: &str = r#"
body { margin: 0; padding: 28px 0 44px; background: #000; color: #33ff33; font-family: "Courier New", monospace; }
#status-bar { position: fixed; top: 0; left: 0; right: 0; display: flex; justify-content: space-between; padding: 4px 12px; background: #111; border-bottom: 1px solid #33ff33; font-size: 13px; z-index: 10; }
#crypto-ticker { position: fixed; bottom: 0; left: 0; right: 0; overflow: hidden; white-space: nowrap; background: #0a0a0a; border-top: 1px solid #33ff33; height: 40px; z-index: 10; }
#crypto-ticker-content { display: inline-flex; align-items: center; height: 100%; animation: ticker-scroll 60s linear infinite; }
.ticker-item { display: inline-flex; align-items: center; gap: 8px; padding: 0 24px; font-size: 14px; }
.led-indicator { width: 8px; height: 8px; border-radius: 50%; }
.ticker-symbol { font-weight: bold; }
.ticker-change.positive { color: #00ff00; }
.ticker-change.negative { color: #ff0000; }
@keyframes ticker-scroll { from { transform: translateX(0); } to { transform: translateX(-33.333%); } }
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: String,
    pub inner_html: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(id: &str) -> Element {
        Element {
            id: id.to_owned(),
            inner_html: String::new(),
            children: vec![],
        }
    }

    pub fn with_child(mut self, child: Element) -> Element {
        self.children.push(child);
        self
    }

    fn find(&self, id: &str) -> Option<&Element> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&format!("<div id=\"{}\">", escape_html(&self.id)));
        out.push_str(&self.inner_html);
        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</div>\n");
    }
}

/// Top-level body elements plus a revision counter that changes on every
/// mutation, so writers can tell when a re-render is due.
#[derive(Debug, Clone)]
pub struct Page {
    title: String,
    body: Vec<Element>,
    revision: u64,
}

impl Page {
    pub fn new(title: &str) -> Page {
        Page {
            title: title.to_owned(),
            body: vec![],
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn body(&self) -> &[Element] {
        &self.body
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.body.iter().find_map(|e| e.find(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_element_by_id(id).is_some()
    }

    pub fn insert_first(&mut self, element: Element) {
        self.body.insert(0, element);
        self.revision += 1;
    }

    pub fn append(&mut self, element: Element) {
        self.body.push(element);
        self.revision += 1;
    }

    /// Returns `false` if no element has `id`.
    pub fn set_inner_html(&mut self, id: &str, html: String) -> bool {
        match self.body.iter_mut().find_map(|e| e.find_mut(id)) {
            Some(element) => {
                if element.inner_html != html {
                    element.inner_html = html;
                    self.revision += 1;
                }
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<meta http-equiv=\"refresh\" content=\"30\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        out.push_str("<style>");
        out.push_str(STYLESHEET);
        out.push_str("</style>\n</head>\n<body>\n");
        for element in &self.body {
            element.render_into(&mut out);
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}
