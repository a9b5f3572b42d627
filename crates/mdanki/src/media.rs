//! Media referenced from card content.
//!
//! Every `src="<path>"` in a rendered card is read from disk, stored under a
//! content-addressed name (`<sha256><ext>`) and the reference is rewritten to
//! that name. Byte-identical files collapse into one [`Media`] entry no
//! matter how many cards or paths point at them, and re-sending a document
//! produces the same names every time.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose};
use regex_lite::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::card::Card;
use crate::error::{Error, Result};

static SRC_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="([^"]*?)""#).expect("valid src pattern"));

// Two or more letters, so Windows drive letters stay local.
static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]+:").expect("valid scheme pattern"));

/// A media file to upload alongside the cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Media {
    #[serde(skip)]
    data: Vec<u8>,
    checksum: String,
    file_name: String,
}

impl Media {
    /// Create a media entry; `extension` includes the leading dot or is empty.
    pub fn new(data: Vec<u8>, extension: &str) -> Self {
        let checksum = checksum(&data);
        let file_name = format!("{}{}", checksum, extension);
        Self {
            data,
            checksum,
            file_name,
        }
    }

    /// Raw file content.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Hex SHA-256 of the content.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Name the file is stored under in Anki.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Wire record for a `storeMediaFile` action.
    pub fn to_record(&self) -> MediaRecord {
        MediaRecord {
            filename: self.file_name.clone(),
            data: general_purpose::STANDARD.encode(&self.data),
        }
    }
}

/// Upload record: target filename plus base64 content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRecord {
    /// Filename in Anki's media folder.
    pub filename: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// Calculate the hex SHA-256 of some bytes.
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Where media bytes come from.
pub trait MediaSource {
    /// Read a whole file.
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<Vec<u8>>> + Send;
}

/// Reads media from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl MediaSource for FsSource {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// A `src="..."` occurrence in card text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reference {
    start: usize,
    end: usize,
    path: String,
}

fn find_references(text: &str) -> Vec<Reference> {
    SRC_ATTRIBUTE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Reference {
                start: whole.start(),
                end: whole.end(),
                path: caps[1].to_string(),
            })
        })
        .collect()
}

/// Remote, protocol-relative and inline resources are left for Anki to deal with.
fn is_local(path: &str) -> bool {
    !(path.is_empty() || path.starts_with("//") || URL_SCHEME.is_match(path))
}

/// Turn an attribute value as emitted by the renderer back into a file path.
///
/// The renderer percent-encodes URLs and HTML-escapes attribute text; both
/// are undone here. Invalid percent sequences are kept literally.
fn reference_path(attribute: &str) -> String {
    let unescaped = attribute
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    match urlencoding::decode(&unescaped) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unescaped,
    }
}

/// Collects media from cards and rewrites their references.
#[derive(Debug, Clone)]
pub struct MediaExtractor<M = FsSource> {
    source: M,
    base_dir: PathBuf,
}

impl MediaExtractor<FsSource> {
    /// Resolve references against `base_dir` on the local file system.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_source(FsSource, base_dir)
    }
}

impl<M: MediaSource> MediaExtractor<M> {
    /// Use a custom byte source.
    pub fn with_source(source: M, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            base_dir: base_dir.into(),
        }
    }

    /// Directory relative references are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Rewrite every card in place and return the distinct media.
    ///
    /// Any unreadable file fails the whole pass; no partial list is returned.
    pub async fn extract(&self, cards: &mut [Card]) -> Result<Vec<Media>> {
        let mut media = Vec::new();

        for card in cards.iter_mut() {
            let question = self.rewrite(card.question(), &mut media).await?;
            card.set_question(question);
            let answer = self.rewrite(card.answer(), &mut media).await?;
            card.set_answer(answer);
        }

        debug!(count = media.len(), "collected media");
        Ok(media)
    }

    async fn rewrite(&self, text: &str, media: &mut Vec<Media>) -> Result<String> {
        let references = find_references(text);
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for reference in references.iter().filter(|r| is_local(&r.path)) {
            out.push_str(&text[last..reference.start]);
            let file_name = self.register(&reference.path, media).await?;
            out.push_str(&format!("src=\"{}\"", file_name));
            last = reference.end;
        }
        out.push_str(&text[last..]);

        Ok(out)
    }

    /// Read one reference and return the name it is stored under.
    async fn register(&self, reference: &str, media: &mut Vec<Media>) -> Result<String> {
        let path = self.base_dir.join(reference_path(reference));
        let data = self
            .source
            .read(&path)
            .await
            .map_err(|source| Error::MediaRead {
                path: path.clone(),
                source,
            })?;

        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let candidate = Media::new(data, &extension);

        if let Some(existing) = media.iter().find(|m| m.checksum == candidate.checksum) {
            return Ok(existing.file_name.clone());
        }

        debug!(path = %path.display(), file_name = %candidate.file_name, "new media");
        let file_name = candidate.file_name.clone();
        media.push(candidate);
        Ok(file_name)
    }
}
