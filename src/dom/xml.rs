//! Strict XHTML reader building an ArenaDom with quick-xml.
//!
//! Conversion engines typically emit well-formed XHTML fragments. Reading
//! them as XML keeps every element exactly where the engine put it, including
//! elements an HTML tree builder would drop or move, such as a `<caption>`
//! that still sits next to its table.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use super::arena::{ArenaDom, Attribute, NodeId, html_qname};

/// Parse a well-formed XHTML string into `dom`, appending under `parent`.
pub fn read_into(dom: &mut ArenaDom, parent: NodeId, content: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut stack = vec![parent];

    loop {
        let current = *stack.last().unwrap_or(&parent);
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let el = start_element(dom, &e)?;
                dom.append(current, el);
                stack.push(el);
            }
            Ok(Event::Empty(e)) => {
                let el = start_element(dom, &e)?;
                dom.append(current, el);
            }
            Ok(Event::End(_)) => {
                if stack.len() <= 1 {
                    return Err(format!(
                        "unbalanced end tag at byte {}",
                        reader.buffer_position()
                    ));
                }
                stack.pop();
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(e.as_ref());
                dom.append_text(current, &raw);
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(resolved) => dom.append_text(current, &resolved),
                    None => return Err(format!("unknown entity &{entity};")),
                }
            }
            Ok(Event::CData(e)) => {
                let raw = String::from_utf8_lossy(e.as_ref());
                dom.append_text(current, &raw);
            }
            Ok(Event::Comment(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                let comment = dom.create_comment(text);
                dom.append(current, comment);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(e.to_string()),
        }
    }

    if stack.len() > 1 {
        return Err("unclosed element at end of input".to_string());
    }
    Ok(())
}

fn start_element(dom: &mut ArenaDom, e: &BytesStart<'_>) -> Result<NodeId, String> {
    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let raw = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
        let value = unescape(&raw).map_err(|err| err.to_string())?.into_owned();
        attrs.push(Attribute::new(&key, value));
    }

    Ok(dom.create_element(html_qname(&tag), attrs))
}

/// Resolve the XML predefined entities and numeric character references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        "nbsp" => return Some("\u{a0}".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}
