// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable fakes for every collaborator trait.
//!
//! Each fake records its calls and can be switched into a failure mode, so
//! engine and API tests can drive whole pipelines without yt-dlp, ffmpeg,
//! or the network.

use crate::art::{ArtError, CoverArtFetcher};
use crate::download::{AudioDownloader, DownloadError};
use crate::identity::{IdentityError, IdentityProvider};
use crate::metadata::{MetadataError, MetadataSearcher};
use crate::subprocess::SubprocessError;
use crate::tag::{TagError, TagSet, Tagger};
use crate::transcode::{TranscodeError, Transcoder};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tt_core::SourceCandidate;

fn subprocess_io(label: &str) -> SubprocessError {
    SubprocessError::Spawn {
        label: label.to_string(),
        source: std::io::Error::other("injected failure"),
    }
}

/// Identity provider returning a scripted candidate list.
#[derive(Default)]
pub struct FakeIdentity {
    candidates: Vec<SourceCandidate>,
    fail: bool,
    tool_missing: bool,
    pub calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn with_candidates(candidates: Vec<SourceCandidate>) -> Self {
        Self { candidates, ..Self::default() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn tool_missing() -> Self {
        Self { tool_missing: true, ..Self::default() }
    }

    /// A plausible candidate for tests that only need one.
    pub fn candidate(title: &str, artist: &str, video_id: &str) -> SourceCandidate {
        SourceCandidate {
            title: title.to_string(),
            artists: vec![artist.to_string()],
            album: None,
            video_id: video_id.to_string(),
            duration: Some(239),
            uploader: Some(artist.to_string()),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn search(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<SourceCandidate>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.tool_missing {
            return Err(IdentityError::ToolNotFound("yt-dlp".to_string()));
        }
        if self.fail {
            return Err(IdentityError::Search("injected failure".to_string()));
        }
        Ok(self.candidates.iter().take(limit).cloned().collect())
    }
}

/// What a [`FakeDownloader`] does when invoked.
pub enum DownloadBehavior {
    /// Write the given file names (with a little content) into the dest dir.
    WriteFiles(Vec<String>),
    ToolMissing,
    ExitNonZero,
    /// Surface an io-level error, which the pipeline treats as retryable.
    IoError,
}

pub struct FakeDownloader {
    behavior: DownloadBehavior,
    pub calls: AtomicUsize,
    /// Invoked at the start of every call; lets tests interleave store
    /// mutations (e.g. cancellation) with an in-flight step.
    on_call: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl FakeDownloader {
    pub fn new(behavior: DownloadBehavior) -> Self {
        Self { behavior, calls: AtomicUsize::new(0), on_call: Mutex::new(None) }
    }

    /// One plausible audio file.
    pub fn single_file() -> Self {
        Self::new(DownloadBehavior::WriteFiles(vec!["Creep.webm".to_string()]))
    }

    pub fn on_call(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        *self.on_call.lock() = Some(Box::new(hook));
        self
    }
}

#[async_trait]
impl AudioDownloader for FakeDownloader {
    async fn download(
        &self,
        _url: &str,
        dest_dir: &Path,
        _verbose: bool,
    ) -> Result<(), DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.on_call.lock().as_ref() {
            hook();
        }
        match &self.behavior {
            DownloadBehavior::WriteFiles(names) => {
                for name in names {
                    std::fs::write(dest_dir.join(name), b"audio-bytes")
                        .map_err(|e| DownloadError::Subprocess(SubprocessError::Spawn {
                            label: "fake download".to_string(),
                            source: e,
                        }))?;
                }
                Ok(())
            }
            DownloadBehavior::ToolMissing => {
                Err(DownloadError::ToolNotFound("yt-dlp".to_string()))
            }
            DownloadBehavior::ExitNonZero => Err(DownloadError::Failed {
                status: 1,
                stderr: "injected failure".to_string(),
            }),
            DownloadBehavior::IoError => {
                Err(DownloadError::Subprocess(subprocess_io("fake download")))
            }
        }
    }
}

/// Transcoder that writes `<input>.mp3` next to the input.
#[derive(Default)]
pub struct FakeTranscoder {
    fail: bool,
    tool_missing: bool,
    pub calls: AtomicUsize,
    on_call: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn tool_missing() -> Self {
        Self { tool_missing: true, ..Self::default() }
    }

    pub fn on_call(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        *self.on_call.lock() = Some(Box::new(hook));
        self
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn to_mp3_320(&self, input: &Path) -> Result<PathBuf, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.on_call.lock().as_ref() {
            hook();
        }
        if self.tool_missing {
            return Err(TranscodeError::ToolNotFound("ffmpeg".to_string()));
        }
        if self.fail {
            return Err(TranscodeError::Failed { status: 1, stderr: "injected failure".to_string() });
        }
        let output = input.with_extension("mp3");
        std::fs::write(&output, b"mp3-bytes")
            .map_err(|e| TranscodeError::Subprocess(SubprocessError::Spawn {
                label: "fake transcode".to_string(),
                source: e,
            }))?;
        Ok(output)
    }
}

/// Metadata searcher returning scripted documents.
#[derive(Default)]
pub struct FakeMetadata {
    results: Vec<serde_json::Value>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeMetadata {
    pub fn with_results(results: Vec<serde_json::Value>) -> Self {
        Self { results, ..Self::default() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

#[async_trait]
impl MetadataSearcher for FakeMetadata {
    async fn search_song(
        &self,
        _term: &str,
        _artist: &str,
        limit: usize,
    ) -> Result<Vec<serde_json::Value>, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MetadataError::Unavailable("injected failure".to_string()));
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

/// Tag writer that records every call.
#[derive(Default)]
pub struct FakeTagger {
    fail_tags: bool,
    fail_art: bool,
    pub written: Mutex<Vec<(PathBuf, TagSet)>>,
    pub art_embeds: Mutex<Vec<PathBuf>>,
}

impl FakeTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_tags() -> Self {
        Self { fail_tags: true, ..Self::default() }
    }

    pub fn failing_art() -> Self {
        Self { fail_art: true, ..Self::default() }
    }
}

#[async_trait]
impl Tagger for FakeTagger {
    async fn write_tags(&self, file: &Path, tags: &TagSet) -> Result<(), TagError> {
        if self.fail_tags {
            return Err(TagError::Failed { status: 1, stderr: "injected failure".to_string() });
        }
        self.written.lock().push((file.to_path_buf(), tags.clone()));
        Ok(())
    }

    async fn embed_art(&self, file: &Path, _image: &[u8]) -> Result<(), TagError> {
        if self.fail_art {
            return Err(TagError::Failed { status: 1, stderr: "injected failure".to_string() });
        }
        self.art_embeds.lock().push(file.to_path_buf());
        Ok(())
    }
}

/// Art fetcher returning scripted bytes.
#[derive(Default)]
pub struct FakeArt {
    image: Option<Vec<u8>>,
    fail: bool,
}

impl FakeArt {
    pub fn with_image(image: Vec<u8>) -> Self {
        Self { image: Some(image), fail: false }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

#[async_trait]
impl CoverArtFetcher for FakeArt {
    async fn fetch(
        &self,
        _metadata: &serde_json::Value,
    ) -> Result<Option<Vec<u8>>, ArtError> {
        if self.fail {
            return Err(ArtError::Unavailable("injected failure".to_string()));
        }
        Ok(self.image.clone())
    }
}
