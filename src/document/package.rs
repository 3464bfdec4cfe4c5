//! Zip package access for .docx files.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::DocumentError;

/// Largest decompressed part the service will read
pub(crate) const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

const PREALLOC_CAP: u64 = 1024 * 1024;

/// The raw .docx archive. Entries that are not edited are copied to the
/// output without being decompressed.
#[derive(Debug, Clone)]
pub(crate) struct Package {
    bytes: Vec<u8>,
    names: Vec<String>,
}

impl Package {
    pub fn open(bytes: Vec<u8>) -> Result<Self, DocumentError> {
        let names = {
            let archive = ZipArchive::new(Cursor::new(bytes.as_slice()))?;
            archive.file_names().map(str::to_string).collect()
        };
        Ok(Self { bytes, names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Decompressed contents of entry `name`, if it exists
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, DocumentError> {
        self.read_limited(name, MAX_PART_BYTES)
    }

    /// Like `read`, failing once more than `limit` bytes decompress. The
    /// size declared in the entry header is only a capacity hint.
    fn read_limited(&self, name: &str, limit: u64) -> Result<Option<Vec<u8>>, DocumentError> {
        if !self.contains(name) {
            return Ok(None);
        }
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;
        let file = archive.by_name(name)?;
        let mut buf = Vec::with_capacity(file.size().min(limit).min(PREALLOC_CAP) as usize);
        file.take(limit + 1).read_to_end(&mut buf)?;
        if buf.len() as u64 > limit {
            return Err(DocumentError::PartTooLarge {
                part: name.to_string(),
                max: limit,
            });
        }
        Ok(Some(buf))
    }

    pub fn read_required(&self, name: &str) -> Result<Vec<u8>, DocumentError> {
        self.read(name)?
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))
    }

    /// Write the package to `out`, using `overrides` for the named entries.
    /// Entry order is preserved.
    pub fn write_to<W: Write + Seek>(
        &self,
        out: W,
        overrides: &HashMap<String, Vec<u8>>,
    ) -> Result<W, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;
        let mut writer = ZipWriter::new(out);

        for index in 0..archive.len() {
            let file = archive.by_index_raw(index)?;
            match overrides.get(file.name()) {
                Some(contents) => {
                    let name = file.name().to_string();
                    let method = match file.compression() {
                        CompressionMethod::Stored => CompressionMethod::Stored,
                        _ => CompressionMethod::Deflated,
                    };
                    drop(file);
                    let options = SimpleFileOptions::default().compression_method(method);
                    writer.start_file(name, options)?;
                    writer.write_all(contents)?;
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        Ok(writer.finish()?)
    }
}

/// Directory part of a package entry name, with trailing slash
pub(crate) fn part_dir(name: &str) -> &str {
    match name.rfind('/') {
        Some(idx) => &name[..=idx],
        None => "",
    }
}

/// Relationship part for `name`, e.g. `word/_rels/document.xml.rels`
pub(crate) fn rels_path(name: &str) -> String {
    let dir = part_dir(name);
    let file = &name[dir.len()..];
    format!("{}_rels/{}.rels", dir, file)
}

/// Resolve a relationship target against the directory of its source part
pub(crate) fn resolve_target(source: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = part_dir(source)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
