//! Word document text extraction via docx-rs.
//!
//! Joins paragraph texts in document order, one paragraph per line.

use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use super::ExtractError;

/// Extract paragraph text from a .docx file, newline-separated.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;

    let doc = docx_rs::read_docx(&bytes)
        .map_err(|e| ExtractError::Docx(format!("{}: {e:?}", path.display())))?;

    let mut paragraphs = Vec::new();
    for child in &doc.document.children {
        if let DocumentChild::Paragraph(para) = child {
            paragraphs.push(paragraph_text(para));
        }
    }

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, &mut out),
            ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let ParagraphChild::Run(run) = inner {
                        push_run_text(run, &mut out);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn push_run_text(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        if let RunChild::Text(text) = child {
            out.push_str(&text.text);
        }
    }
}
