use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::document::Document;

/// Extract one [`Document`] per page from every PDF in `dir`.
///
/// Non-PDF files are ignored. An unreadable or corrupt PDF aborts the whole
/// load; ingestion has no partial-skip policy. Pages whose extracted text is
/// empty (scanned images, blank pages) are dropped.
pub fn load_pdf_dir(dir: impl AsRef<Path>) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();
    // Stable ordering so repeated ingestion runs visit files identically.
    paths.sort();

    if paths.is_empty() {
        return Err(anyhow!("No PDF files found in {}", dir.display()));
    }

    let mut documents = Vec::new();
    for path in &paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());

        log::info!("Extracting text from {}", path.display());
        let pages = pdf_extract::extract_text_by_pages(path)
            .with_context(|| format!("Failed to extract text from {}", path.display()))?;

        for (i, text) in pages.into_iter().enumerate() {
            let text = text.trim().to_string();
            if text.is_empty() {
                continue;
            }
            let page = i + 1;
            let mut document = Document::new(format!("{}_p{}", stem, page), text);
            document.metadata.insert("source".to_string(), file_name.clone());
            document.metadata.insert("page".to_string(), page.to_string());
            documents.push(document);
        }
    }

    Ok(documents)
}
