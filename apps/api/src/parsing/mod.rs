//! Resume document parsing: plain text plus basic contact fields.
//!
//! The LLM does all the intelligent extraction; this module only turns an
//! uploaded PDF or DOCX into text and pulls out the few fields the fallback
//! template needs.

mod contact;
pub(crate) mod docx;

use serde::Serialize;
use thiserror::Error;

pub use contact::extract_contact_info;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to extract text from {file_name}: {reason}")]
    Extraction { file_name: String, reason: String },

    #[error("No text could be extracted from {0}")]
    EmptyDocument(String),
}

/// Contact fields recovered from the resume text. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The parsed upload handed to the generator.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub raw_text: String,
    pub contact: ContactInfo,
    pub file_type: String,
}

/// Extracts text from an uploaded resume, dispatching on the file extension.
pub fn parse_resume_bytes(file_name: &str, data: &[u8]) -> Result<ParsedResume, ParseError> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(data).map_err(|e| ParseError::Extraction {
            file_name: file_name.to_string(),
            reason: e.to_string(),
        })?,
        "docx" => docx::extract_docx_text(data).map_err(|e| ParseError::Extraction {
            file_name: file_name.to_string(),
            reason: e.to_string(),
        })?,
        _ => return Err(ParseError::UnsupportedFileType(file_name.to_string())),
    };

    let raw_text = text.trim().to_string();
    if raw_text.is_empty() {
        return Err(ParseError::EmptyDocument(file_name.to_string()));
    }

    let contact = extract_contact_info(&raw_text);

    Ok(ParsedResume {
        raw_text,
        contact,
        file_type: extension,
    })
}
