// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tt-adapters: external collaborators behind trait seams.
//!
//! The pipeline only ever sees these traits; production implementations
//! shell out to yt-dlp/ffmpeg or call HTTP services, and `test-support`
//! fakes script their behavior for engine and API tests.

pub mod art;
pub mod download;
pub mod identity;
pub mod metadata;
pub mod subprocess;
pub mod tag;
pub mod transcode;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use art::{ArtError, CoverArtFetcher, ItunesArtFetcher};
pub use download::{AudioDownloader, DownloadError, YtDlpDownloader};
pub use identity::{IdentityError, IdentityProvider, YtDlpSearchProvider};
pub use metadata::{ItunesClient, MetadataError, MetadataSearcher};
pub use subprocess::{resolve_tool, run_with_timeout, SubprocessError};
pub use tag::{FfmpegTagger, TagError, TagSet, Tagger};
pub use transcode::{FfmpegTranscoder, TranscodeError, Transcoder};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{
    DownloadBehavior, FakeArt, FakeDownloader, FakeIdentity, FakeMetadata, FakeTagger,
    FakeTranscoder,
};
