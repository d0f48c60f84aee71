/*!
 * Transcript document output.
 *
 * The `.docx` emitter writes a minimal WordprocessingML package by hand:
 * content types, package relationships, the document part and a small
 * style sheet holding the Normal and Title styles.
 */

use std::io::Write;
use std::path::Path;
use log::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;
use crate::app_config::DocumentConfig;
use crate::errors::EmitError;
use crate::transcript::DialogueGroup;

// @const: Twentieths of a point per point
const TWIPS_PER_POINT: u32 = 20;

/// Anything that can turn grouped dialogue into a document on disk
pub trait DocumentEmitter {
    /// File extension of the produced documents, without the dot
    fn extension(&self) -> &str;

    /// Write a document for `groups` to `destination`.
    ///
    /// Implementations must refuse empty input with [`EmitError::EmptyTranscript`]
    /// and must not leave a partially written file behind on failure.
    fn emit(&self, groups: &[DialogueGroup], destination: &Path) -> Result<(), EmitError>;
}

/// Emits `.docx` transcripts
#[derive(Debug, Clone, Default)]
pub struct DocxEmitter {
    config: DocumentConfig,
}

impl DocxEmitter {
    /// Create an emitter with the given layout
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Layout used by this emitter
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    fn write_package<W: Write + std::io::Seek>(&self, writer: W, document_xml: &str) -> Result<(), EmitError> {
        let mut zip = ZipWriter::new(writer);
        let opt = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", opt)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.add_directory("_rels/", opt)?;
        zip.start_file("_rels/.rels", opt)?;
        zip.write_all(PACKAGE_RELS_XML.as_bytes())?;

        zip.add_directory("word/", opt)?;
        zip.add_directory("word/_rels/", opt)?;

        zip.start_file("word/document.xml", opt)?;
        zip.write_all(document_xml.as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", opt)?;
        zip.write_all(DOCUMENT_RELS_XML.as_bytes())?;

        zip.start_file("word/styles.xml", opt)?;
        zip.write_all(STYLES_XML.as_bytes())?;

        zip.finish()?;
        Ok(())
    }
}

impl DocumentEmitter for DocxEmitter {
    fn extension(&self) -> &str {
        &self.config.output_extension
    }

    fn emit(&self, groups: &[DialogueGroup], destination: &Path) -> Result<(), EmitError> {
        if groups.is_empty() {
            return Err(EmitError::EmptyTranscript);
        }

        let document_xml = render_document_xml(groups, self.config());

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        // Build next to the destination so the final rename stays on one filesystem
        let mut temp = tempfile::Builder::new()
            .prefix(".ass2docx-")
            .suffix(".tmp")
            .tempfile_in(parent)?;
        self.write_package(&mut temp, &document_xml)?;
        temp.as_file().sync_all()?;

        temp.persist(destination).map_err(|e| EmitError::Persist {
            path: destination.to_path_buf(),
            message: e.error.to_string(),
        })?;

        debug!("Wrote {} row(s) to {:?}", groups.len(), destination);
        Ok(())
    }
}

/// Render `word/document.xml` for a transcript.
///
/// One Title paragraph followed by a borderless two-column table with a row
/// per group: bold `speaker:` on the left, the text on the right with one
/// line break per merged line.
pub fn render_document_xml(groups: &[DialogueGroup], config: &DocumentConfig) -> String {
    let speaker_width = config.speaker_column_width_pt.saturating_mul(TWIPS_PER_POINT);
    let dialogue_width = config.dialogue_column_width_pt.saturating_mul(TWIPS_PER_POINT);

    let mut body = String::new();

    body.push_str(r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t xml:space="preserve">"#);
    body.push_str(&xml_escape_text(&config.heading));
    body.push_str("</w:t></w:r></w:p>");

    body.push_str("<w:tbl><w:tblPr>");
    body.push_str(&format!(r#"<w:tblW w:w="{}" w:type="dxa"/>"#, speaker_width.saturating_add(dialogue_width)));
    body.push_str(r#"<w:jc w:val="left"/>"#);
    body.push_str(TABLE_BORDERS_NONE);
    body.push_str(r#"<w:tblLayout w:type="fixed"/>"#);
    body.push_str("</w:tblPr><w:tblGrid>");
    body.push_str(&format!(r#"<w:gridCol w:w="{}"/><w:gridCol w:w="{}"/>"#, speaker_width, dialogue_width));
    body.push_str("</w:tblGrid>");

    for group in groups {
        body.push_str("<w:tr>");

        body.push_str(&cell_open(speaker_width));
        body.push_str(r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">"#);
        body.push_str(&xml_escape_text(&group.speaker));
        body.push_str(":</w:t></w:r></w:p></w:tc>");

        body.push_str(&cell_open(dialogue_width));
        body.push_str("<w:p><w:r>");
        for (i, line) in group.lines().enumerate() {
            if i > 0 {
                body.push_str("<w:br/>");
            }
            body.push_str(r#"<w:t xml:space="preserve">"#);
            body.push_str(&xml_escape_text(line));
            body.push_str("</w:t>");
        }
        body.push_str("</w:r></w:p></w:tc>");

        body.push_str("</w:tr>");
    }
    body.push_str("</w:tbl>");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
 xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    {body}
    <w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#
    )
}

fn cell_open(width: u32) -> String {
    format!(r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>"#, width)
}

/// Escape text for a `w:t` element, dropping characters XML 1.0 forbids
fn xml_escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

// XML 1.0 Char production without CR and LF; line breaks are written as <w:br/>
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

const TABLE_BORDERS_NONE: &str = concat!(
    "<w:tblBorders>",
    r#"<w:top w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
    r#"<w:left w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
    r#"<w:bottom w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
    r#"<w:right w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
    r#"<w:insideH w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
    r#"<w:insideV w:val="none" w:sz="0" w:space="0" w:color="auto"/>"#,
    "</w:tblBorders>",
);

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Title">
    <w:name w:val="Title"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:qFormat/>
    <w:pPr><w:spacing w:after="300"/><w:contextualSpacing/></w:pPr>
    <w:rPr><w:sz w:val="56"/><w:szCs w:val="56"/></w:rPr>
  </w:style>
</w:styles>"#;
