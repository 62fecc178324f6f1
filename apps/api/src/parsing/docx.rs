use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

/// Reads `word/document.xml` and joins paragraph text with newlines.
pub(super) fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    // No trimming: entity references split a run's text into several events,
    // and the spaces next to them belong to the text.
    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = in_paragraph,
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = false;
                } else if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            Ok(Event::Empty(e)) => {
                // <w:tab/> inside a run
                if in_paragraph && e.name().as_ref() == b"w:tab" {
                    current.push(' ');
                }
            }
            Ok(Event::Text(e)) => {
                if in_text {
                    current.push_str(&e.xml_content()?);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text {
                    match e.resolve_char_ref()? {
                        Some(c) => current.push(c),
                        None => {
                            let name = e.decode()?;
                            match predefined_entity(&name) {
                                Some(c) => current.push(c),
                                None => {
                                    current.push('&');
                                    current.push_str(&name);
                                    current.push(';');
                                }
                            }
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}
