// XML plumbing: an escaping builder for request documents and a small element tree for responses
use crate::error::MalformedResponse;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::escape::escape;
use quick_xml::Reader;
use std::fmt::Display;
use std::str::FromStr;

/// Append-only builder for request documents.
#[derive(Debug, Default)]
pub struct XmlBuilder {
    buf: String,
}

impl XmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, tag: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    pub fn empty(&mut self, tag: &str) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push_str("/>");
        self
    }

    /// `<tag>escaped text</tag>`
    pub fn text(&mut self, tag: &str, text: &str) -> &mut Self {
        self.open(tag);
        self.buf.push_str(&escape(text));
        self.close(tag)
    }

    pub fn value(&mut self, tag: &str, value: impl Display) -> &mut Self {
        self.text(tag, &value.to_string())
    }

    pub fn float(&mut self, tag: &str, value: f64) -> &mut Self {
        self.text(tag, &format_float(value))
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Shortest round-trip form, always with a fractional part for integral values (`2.0`).
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

/// Parsed XML element: tag name, attributes, child elements and concatenated text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    /// Parse a complete document and return its root element.
    pub fn parse(xml: &str) -> Result<Element, MalformedResponse> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let element = Element::from_start(&start)?;
                    reject_second_root(&stack, &root, &element)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    reject_second_root(&stack, &root, &element)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    match stack.last_mut() {
                        Some(top) => top.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(MalformedResponse::ContentOutsideRoot(text.trim().to_string()));
                        }
                    }
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    match stack.last_mut() {
                        Some(top) => top.text.push_str(&text),
                        None => return Err(MalformedResponse::ContentOutsideRoot(text)),
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(open.name)).into());
        }

        root.ok_or(MalformedResponse::EmptyDocument)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element, MalformedResponse> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            ..Default::default()
        })
    }

    /// Fail unless this element carries the tag `expected`.
    pub fn expect_root(
        self,
        document: &'static str,
        expected: &'static str,
    ) -> Result<Element, MalformedResponse> {
        if self.name != expected {
            return Err(MalformedResponse::UnexpectedRoot {
                document,
                expected,
                actual: self.name,
            });
        }
        Ok(self)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn required_child(
        &self,
        document: &'static str,
        field: &'static str,
    ) -> Result<&Element, MalformedResponse> {
        self.child(field)
            .ok_or(MalformedResponse::MissingField { document, field })
    }

    pub fn required_text(
        &self,
        document: &'static str,
        field: &'static str,
    ) -> Result<&str, MalformedResponse> {
        Ok(self.required_child(document, field)?.text.as_str())
    }

    /// Text of the child `field` converted with `FromStr`.
    pub fn required_number<T>(
        &self,
        document: &'static str,
        field: &'static str,
    ) -> Result<T, MalformedResponse>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        parse_number(field, self.required_text(document, field)?)
    }

    pub fn optional_text(&self, field: &str) -> Option<&str> {
        self.child(field).map(|c| c.text.as_str())
    }
}

fn reject_second_root(
    stack: &[Element],
    root: &Option<Element>,
    element: &Element,
) -> Result<(), MalformedResponse> {
    if stack.is_empty() && root.is_some() {
        return Err(MalformedResponse::ContentOutsideRoot(format!("<{}>", element.name)));
    }
    Ok(())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

pub fn parse_number<T>(field: &'static str, text: &str) -> Result<T, MalformedResponse>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| MalformedResponse::InvalidNumber {
            field,
            value: text.to_string(),
            source: Box::new(e),
        })
}

pub fn parse_bool(field: &'static str, text: &str) -> Result<bool, MalformedResponse> {
    parse_number(field, &text.trim().to_ascii_lowercase())
}
