//! Document compositor.
//!
//! Produces a final document by stamping field values onto a pre-rendered
//! template: the variable text and marks are built as an overlay content
//! stream and layered over the template's first page (template content
//! underneath, overlay on top). Any additional template pages pass through
//! unchanged, and output is written through a scratch file that is removed
//! on every exit path.

pub mod coords;
mod overlay;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Result, ShowroomError};
use crate::fs::ScratchFile;

pub use coords::{CoordinateMap, Position};
pub use overlay::format_amount;

/// Field key to value for one document instance. Ordered so output is
/// deterministic for a given input.
pub type FieldValues = BTreeMap<String, String>;

/// Render `fields` onto the template at `template_path` and write the
/// merged document to `out_path`.
///
/// # Errors
///
/// - `ShowroomError::TemplateNotFound` when the template file is missing;
///   nothing is written.
/// - `ShowroomError::Render` for any load, drawing or save failure. The
///   scratch file is removed in every case.
pub fn render(
    template_path: &Path,
    map: &CoordinateMap,
    fields: &FieldValues,
    out_path: &Path,
) -> Result<()> {
    if !template_path.exists() {
        return Err(ShowroomError::TemplateNotFound(template_path.to_path_buf()));
    }

    let mut doc = Document::load(template_path).map_err(|e| {
        ShowroomError::Render(format!(
            "Failed to load template {}: {}",
            template_path.display(),
            e
        ))
    })?;

    let first_page = doc
        .get_pages()
        .into_values()
        .next()
        .ok_or_else(|| ShowroomError::Render("Template has no pages".to_string()))?;

    let content = overlay::build_overlay(map, fields);
    let encoded = content
        .encode()
        .map_err(|e| ShowroomError::Render(format!("Failed to encode overlay: {}", e)))?;
    let stream_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    register_overlay_font(&mut doc, first_page)?;
    append_page_content(&mut doc, first_page, stream_id)?;

    write_output(&mut doc, out_path)
}

/// Append the overlay stream after the page's existing content so the
/// template stays underneath.
fn append_page_content(doc: &mut Document, page_id: ObjectId, stream_id: ObjectId) -> Result<()> {
    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    let contents = match page.get(b"Contents") {
        Ok(Object::Reference(existing)) => {
            vec![Object::Reference(*existing), Object::Reference(stream_id)]
        }
        Ok(Object::Array(existing)) => {
            let mut array = existing.clone();
            array.push(Object::Reference(stream_id));
            array
        }
        _ => vec![Object::Reference(stream_id)],
    };
    page.set("Contents", contents);
    Ok(())
}

/// Register the overlay's Helvetica font on the first page without
/// disturbing whatever resources the template already carries.
fn register_overlay_font(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    // Start from the page's effective resources (possibly inherited from
    // the page tree) so setting them at page level hides nothing.
    let mut resources = effective_resources(doc, page_id)?;
    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(existing)) => existing.clone(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .map(Dictionary::clone)
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    };
    fonts.set(overlay::OVERLAY_FONT, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// The page's resource dictionary, following the page-tree inheritance
/// chain when the page has none of its own.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut current = page_id;
    loop {
        let dict = doc.get_object(current).and_then(Object::as_dict)?;
        if let Ok(entry) = dict.get(b"Resources") {
            return match entry {
                Object::Dictionary(direct) => Ok(direct.clone()),
                Object::Reference(id) => {
                    Ok(doc.get_object(*id).and_then(Object::as_dict)?.clone())
                }
                _ => Ok(Dictionary::new()),
            };
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return Ok(Dictionary::new()),
        }
    }
}

fn write_output(doc: &mut Document, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ShowroomError::Render(format!(
                "Failed to create output directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let scratch = ScratchFile::for_target(out_path)
        .map_err(|e| ShowroomError::Render(format!("Failed to reserve scratch file: {}", e)))?;
    doc.save(scratch.path())
        .map_err(|e| ShowroomError::Render(format!("Failed to write document: {}", e)))?;
    scratch
        .persist(out_path)
        .map_err(|e| ShowroomError::Render(format!("Failed to finalize output: {}", e)))?;
    Ok(())
}
