//! VFS Tree Builder
//!
//! Turns a markup declaration into a [`Vfs`]:
//!
//! ```text
//! <vfs>
//!   <dir name="root">
//!     <dir name="etc"><file name="motd">hello</file></dir>
//!     <file name="readme.txt" encoding="base64">aGVsbG8=</file>
//!   </dir>
//! </vfs>
//! ```
//!
//! Structural problems abort the whole load. A file whose content cannot be
//! decoded is still mounted, with a placeholder body and a recorded warning.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use super::tree::Vfs;
use super::types::*;
use crate::parser::{parse_markup, Element};

const DOCUMENT_TAG: &str = "vfs";
const DIR_TAG: &str = "dir";
const FILE_TAG: &str = "file";
const ROOT_NAME: &str = "root";

/// Parse and build a VFS, rejecting a root with no children.
pub fn load(markup: &str) -> Result<Vfs, LoadError> {
    let document = parse_markup(markup)?;
    let vfs = build_tree(&document)?;
    if vfs.list_children(vfs.root()).next().is_none() {
        return Err(LoadError::EmptyVfs);
    }
    info!(nodes = vfs.len(), warnings = vfs.warnings().len(), "VFS mounted");
    Ok(vfs)
}

/// Read a declaration from disk and [`load`] it.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vfs, LoadError> {
    let path = path.as_ref();
    debug!("Reading VFS declaration: {}", path.display());
    let markup = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    load(&markup)
}

/// Build a tree from a parsed `<vfs>` document element.
///
/// Does not apply the non-empty-root check; see [`load`].
pub fn build_tree(document: &Element) -> Result<Vfs, LoadError> {
    if document.tag != DOCUMENT_TAG {
        return Err(malformed(format!(
            "expected <{}> as the top-level element, found <{}>",
            DOCUMENT_TAG, document.tag
        )));
    }

    let mut top = document.elements();
    let root_element = top
        .next()
        .ok_or_else(|| malformed(format!("<{}> contains no root directory", DOCUMENT_TAG)))?;
    if root_element.tag != DIR_TAG || root_element.attr("name") != Some(ROOT_NAME) {
        return Err(malformed(format!(
            "first element inside <{}> must be <{} name=\"{}\">",
            DOCUMENT_TAG, DIR_TAG, ROOT_NAME
        )));
    }
    if let Some(extra) = top.next() {
        return Err(malformed(format!(
            "unexpected <{}> on line {} after the root directory",
            extra.tag, extra.line
        )));
    }

    let root = Node::new_directory(ROOT_NAME).map_err(|e| node_error(e, root_element))?;
    let mut vfs = Vfs::new(root).map_err(|e| node_error(e, root_element))?;
    let root_id = vfs.root();
    build_children(&mut vfs, root_id, root_element)?;
    debug!(nodes = vfs.len(), "VFS tree built");
    Ok(vfs)
}

/// Recursion depth is bounded by [`crate::parser::MAX_NESTING_DEPTH`].
fn build_children(vfs: &mut Vfs, parent: NodeId, element: &Element) -> Result<(), LoadError> {
    for child in element.elements() {
        match child.tag.as_str() {
            DIR_TAG => {
                let name = required_name(child)?;
                let node = Node::new_directory(name).map_err(|e| node_error(e, child))?;
                let id = vfs.attach_child(parent, node).map_err(|e| node_error(e, child))?;
                build_children(vfs, id, child)?;
            }
            FILE_TAG => {
                let name = required_name(child)?;
                if let Some(nested) = child.elements().next() {
                    return Err(LoadError::NotADirectory {
                        name: name.to_string(),
                        tag: nested.tag.clone(),
                    });
                }
                let path = format!("{}/{}", vfs.absolute_path(parent), name);
                let content = match file_content(child) {
                    Ok(content) => content,
                    Err((content, reason)) => {
                        warn!("Could not decode content of {}: {}", path, reason);
                        vfs.push_warning(DecodeWarning { path, reason });
                        content
                    }
                };
                let node = Node::new_file(name, content).map_err(|e| node_error(e, child))?;
                vfs.attach_child(parent, node).map_err(|e| node_error(e, child))?;
            }
            other => {
                return Err(LoadError::UnknownElementKind {
                    tag: other.to_string(),
                    line: child.line,
                });
            }
        }
    }
    Ok(())
}

/// Decode a `<file>` body. On a decoding problem returns the best content
/// available together with the reason.
fn file_content(element: &Element) -> Result<String, (String, String)> {
    let text = element.text();
    match element.attr("encoding") {
        None => Ok(text),
        Some("base64") => {
            let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| {
                let reason = format!("invalid base64: {}", e);
                (format!("<undecodable content: {}>", reason), reason)
            })?;
            String::from_utf8(bytes).map_err(|e| {
                let content = String::from_utf8_lossy(e.as_bytes()).into_owned();
                (content, format!("decoded bytes are not valid UTF-8: {}", e.utf8_error()))
            })
        }
        Some(other) => {
            warn!(
                "Unknown encoding '{}' on <{}> line {}, using content verbatim",
                other, FILE_TAG, element.line
            );
            Ok(text)
        }
    }
}

fn required_name(element: &Element) -> Result<&str, LoadError> {
    match element.attr("name") {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(LoadError::MissingName {
            element: element.tag.clone(),
            line: element.line,
        }),
    }
}

fn node_error(err: VfsError, element: &Element) -> LoadError {
    match err {
        VfsError::InvalidName => LoadError::MissingName {
            element: element.tag.clone(),
            line: element.line,
        },
        VfsError::DuplicateName { parent, name } => LoadError::DuplicateName { parent, name },
        VfsError::NotADirectory { name } => LoadError::NotADirectory {
            name,
            tag: element.tag.clone(),
        },
    }
}

fn malformed(reason: String) -> LoadError {
    LoadError::MalformedVfs { reason }
}
