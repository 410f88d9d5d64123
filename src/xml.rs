//! A small owned XML tree, just enough to walk an RSS feed by local tag name.
//!
//! Tags are stored in Clark notation (`{namespace-uri}localname`, or a bare
//! `localname` when the element is in no namespace), so prefixes chosen by the
//! feed author never matter. Compare tags with [`local_name`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{Error, Result};

/// Strip the `{namespace-uri}` part of a qualified tag, returning the local name.
///
/// Tags without a namespace are returned unchanged.
pub fn local_name(tag: &str) -> &str {
    tag.rsplit_once('}').map_or(tag, |(_, local)| local)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Character data preceding the first child element.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Parse a complete document, returning its root element.
    pub fn parse(bytes: &[u8]) -> Result<Element> {
        let mut reader = NsReader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_resolved_event_into(&mut buf)? {
                (ns, Event::Start(e)) => {
                    let tag = qualified_name(ns, &e)?;
                    stack.push(Element::new(tag));
                }
                (ns, Event::Empty(e)) => {
                    let el = Element::new(qualified_name(ns, &e)?);
                    close(el, &mut stack, &mut root)?;
                }
                (_, Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unexpected end tag".to_string()))?;
                    close(el, &mut stack, &mut root)?;
                }
                (_, Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                    push_text(stack.last_mut(), &text)?;
                }
                (_, Event::CData(c)) => {
                    let text = std::str::from_utf8(&c)
                        .map_err(|e| Error::Xml(format!("CDATA is not UTF-8: {e}")))?;
                    push_text(stack.last_mut(), text)?;
                }
                (_, Event::Eof) => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(Error::Xml(format!("unclosed element <{}>", open.tag)));
        }
        root.ok_or_else(|| Error::Xml("no root element".to_string()))
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// This element followed by all of its descendants, depth-first pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Every element in [`Element::iter`] order whose local tag is `local`.
    pub fn named<'a, 'b>(
        &'a self,
        local: &'b str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'b> {
        self.iter().filter(move |el| el.local_name() == local)
    }

    /// Trimmed text of the first element named `local` whose text is not blank.
    pub fn find_text(&self, local: &str) -> Option<&str> {
        self.named(local)
            .map(|el| el.text.trim())
            .find(|text| !text.is_empty())
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        self.stack.extend(el.children.iter().rev());
        Some(el)
    }
}

fn qualified_name(ns: ResolveResult, e: &BytesStart) -> Result<String> {
    let local = utf8(e.local_name().into_inner())?;
    match ns {
        ResolveResult::Bound(uri) => Ok(format!("{{{}}}{local}", utf8(uri.0)?)),
        ResolveResult::Unbound => Ok(local.to_string()),
        ResolveResult::Unknown(prefix) => Err(Error::Xml(format!(
            "unbound prefix '{}' on <{local}>",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::Xml(format!("name is not UTF-8: {e}")))
}

fn push_text(el: Option<&mut Element>, text: &str) -> Result<()> {
    match el {
        // Only the leading text belongs to the element, the rest is tail of a child.
        Some(el) if el.children.is_empty() => el.text.push_str(text),
        Some(_) => {}
        None if text.trim().is_empty() => {}
        None => {
            return Err(Error::Xml(format!(
                "text outside the root element: '{}'",
                text.trim()
            )));
        }
    }
    Ok(())
}

fn close(el: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_none() => *root = Some(el),
        None => return Err(Error::Xml("multiple root elements".to_string())),
    }
    Ok(())
}
