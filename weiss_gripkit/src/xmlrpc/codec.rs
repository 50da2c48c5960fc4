//! XML encoding and decoding of method calls and responses.
//!
//! The writer side formats documents directly. The reader side pulls events
//! from `quick-xml` into a small element tree and then interprets it, which
//! keeps the XML-RPC shape checks in one place.

use std::fmt::Display;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use super::value::{Params, Value};
use crate::RpcError;

const XML_DECL: &str = r#"<?xml version="1.0"?>"#;

pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<methodCall><methodName>");
    xml.push_str(&escape(method));
    xml.push_str("</methodName><params>");
    for param in params {
        xml.push_str("<param>");
        write_value(&mut xml, param);
        xml.push_str("</param>");
    }
    xml.push_str("</params></methodCall>");
    xml
}

pub fn encode_response(value: &Value) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<methodResponse><params><param>");
    write_value(&mut xml, value);
    xml.push_str("</param></params></methodResponse>");
    xml
}

pub fn encode_fault(code: i32, description: &str) -> String {
    let fault = Value::from_members([
        ("faultCode", Value::from(code)),
        ("faultString", Value::from(description)),
    ]);
    let mut xml = String::from(XML_DECL);
    xml.push_str("<methodResponse><fault>");
    write_value(&mut xml, &fault);
    xml.push_str("</fault></methodResponse>");
    xml
}

/// Decodes a `<methodResponse>`. A `<fault>` body is returned as [`RpcError::Fault`].
pub fn decode_response(xml: &str) -> Result<Value, RpcError> {
    let root = parse_document(xml)?;
    root.expect_name("methodResponse")?;
    let body = root
        .children
        .first()
        .ok_or_else(|| malformed("empty <methodResponse>"))?;

    match body.name.as_str() {
        "params" => match body.children.first() {
            Some(param) => decode_value(param.child("value")?),
            None => Ok(Value::Nil),
        },
        "fault" => Err(decode_fault(&decode_value(body.child("value")?)?)),
        other => Err(malformed(format!("unexpected <{}> in <methodResponse>", other))),
    }
}

/// Decodes a `<methodCall>` into the method name and its parameters.
pub fn decode_call(xml: &str) -> Result<(String, Params), RpcError> {
    let root = parse_document(xml)?;
    root.expect_name("methodCall")?;
    let method = root.child("methodName")?.text.trim().to_string();
    if method.is_empty() {
        return Err(malformed("empty <methodName>"));
    }

    let mut params = Params::new();
    if let Some(list) = root.children.iter().find(|c| c.name == "params") {
        for param in list.children_named("param") {
            params.push(decode_value(param.child("value")?)?);
        }
    }
    Ok((method, params))
}

fn decode_fault(value: &Value) -> RpcError {
    let code = match value.int_member("faultCode") {
        Ok(code) => code,
        Err(e) => return e,
    };
    let code = match i32::try_from(code) {
        Ok(code) => code,
        Err(_) => return malformed(format!("fault code {} out of range", code)),
    };
    let description = value
        .member("faultString")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    RpcError::Fault { code, description }
}

fn write_value(xml: &mut String, value: &Value) {
    xml.push_str("<value>");
    match value {
        Value::Int(i) => {
            if i32::try_from(*i).is_ok() {
                xml.push_str(&format!("<int>{}</int>", i));
            } else {
                xml.push_str(&format!("<i8>{}</i8>", i));
            }
        }
        Value::Bool(b) => xml.push_str(if *b { "<boolean>1</boolean>" } else { "<boolean>0</boolean>" }),
        Value::Double(d) => xml.push_str(&format!("<double>{}</double>", d)),
        Value::String(s) => {
            xml.push_str("<string>");
            xml.push_str(&escape(s.as_str()));
            xml.push_str("</string>");
        }
        Value::Struct(members) => {
            xml.push_str("<struct>");
            for (name, member) in members {
                xml.push_str("<member><name>");
                xml.push_str(&escape(name.as_str()));
                xml.push_str("</name>");
                write_value(xml, member);
                xml.push_str("</member>");
            }
            xml.push_str("</struct>");
        }
        Value::Array(items) => {
            xml.push_str("<array><data>");
            for item in items {
                write_value(xml, item);
            }
            xml.push_str("</data></array>");
        }
        Value::Nil => xml.push_str("<nil/>"),
    }
    xml.push_str("</value>");
}

fn decode_value(value: &Element) -> Result<Value, RpcError> {
    // Untyped <value> content is a string.
    let typed = match value.children.as_slice() {
        [] => return Ok(Value::String(value.text.clone())),
        [typed] => typed,
        _ => return Err(malformed("<value> holds more than one element")),
    };

    let text = typed.text.trim();
    match typed.name.as_str() {
        "int" | "i4" | "i8" => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| malformed(format!("bad integer `{}`: {}", text, e))),
        "boolean" => match text {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            other => Err(malformed(format!("bad boolean `{}`", other))),
        },
        "double" => text
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|e| malformed(format!("bad double `{}`: {}", text, e))),
        "string" => Ok(Value::String(typed.text.clone())),
        "nil" => Ok(Value::Nil),
        "struct" => {
            let mut members = Vec::new();
            for member in typed.children_named("member") {
                let name = member.child("name")?.text.trim().to_string();
                members.push((name, decode_value(member.child("value")?)?));
            }
            Ok(Value::from_members(members))
        }
        "array" => {
            let data = typed.child("data")?;
            data.children_named("value")
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        other => Err(malformed(format!("unsupported value type <{}>", other))),
    }
}

fn malformed<E: Display>(e: E) -> RpcError {
    RpcError::MalformedReply(e.to_string())
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(raw: &[u8]) -> Result<Self, RpcError> {
        let name = std::str::from_utf8(raw).map_err(malformed)?;
        Ok(Self {
            name: name.to_string(),
            ..Default::default()
        })
    }

    fn expect_name(&self, name: &str) -> Result<(), RpcError> {
        if self.name == name {
            Ok(())
        } else {
            Err(malformed(format!("expected <{}>, found <{}>", name, self.name)))
        }
    }

    fn child(&self, name: &str) -> Result<&Element, RpcError> {
        self.children
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| malformed(format!("<{}> has no <{}>", self.name, name)))
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn parse_document(xml: &str) -> Result<Element, RpcError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => stack.push(Element::named(e.name().as_ref())?),
            Event::Empty(e) => {
                let element = Element::named(e.name().as_ref())?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape().map_err(malformed)?);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                let done = stack.pop().ok_or_else(|| malformed("unbalanced end tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => return Ok(done),
                }
            }
            Event::Eof => return Err(malformed("unexpected end of document")),
            _ => {}
        }
    }
}
