// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One handler per non-terminal pipeline state.
//!
//! Handlers receive the job, call their collaborators, and leave the state
//! they were registered for. Pause states have no handlers: the HTTP layer
//! mutates paused jobs directly.

mod archive;
mod download;
mod extract;
mod init;
mod match_metadata;
mod resolve_identity;
mod search;
mod store;
mod tag;

pub use archive::ArchivingHandler;
pub use download::DownloadingHandler;
pub use extract::ExtractingHandler;
pub use init::InitHandler;
pub use match_metadata::MatchingMetadataHandler;
pub use resolve_identity::ResolveIdentityHandler;
pub use search::SearchingHandler;
pub use store::StoringHandler;
pub use tag::TaggingHandler;

use crate::pipeline::Pipeline;
use std::sync::Arc;
use tt_adapters::{
    AudioDownloader, CoverArtFetcher, IdentityProvider, MetadataSearcher, Tagger, Transcoder,
};
use tt_core::{Clock, PipelineState};
use tt_storage::JobStore;

/// Number of identity candidates kept on the job.
pub const SOURCE_CANDIDATE_LIMIT: usize = 5;

/// Number of metadata candidates requested per search.
pub const METADATA_CANDIDATE_LIMIT: usize = 5;

/// Metadata confidence below which the user is asked to choose.
pub const METADATA_CONFIDENCE_FLOOR: i64 = 60;

/// Everything the standard pipeline's handlers depend on.
#[derive(Clone)]
pub struct PipelineDeps {
    pub identity: Arc<dyn IdentityProvider>,
    pub downloader: Arc<dyn AudioDownloader>,
    pub transcoder: Arc<dyn Transcoder>,
    pub metadata: Arc<dyn MetadataSearcher>,
    pub art: Arc<dyn CoverArtFetcher>,
    pub tagger: Arc<dyn Tagger>,
    pub store: Arc<dyn JobStore>,
    pub clock: Arc<dyn Clock>,
}

/// Build the canonical pipeline: every non-terminal, non-pause state gets
/// its handler.
pub fn standard_pipeline(deps: PipelineDeps) -> Pipeline {
    let mut pipeline = Pipeline::new();

    pipeline.register(PipelineState::Init, Box::new(InitHandler::new(deps.clock.clone())));
    pipeline.register(
        PipelineState::ResolvingIdentity,
        Box::new(ResolveIdentityHandler::new(deps.identity.clone(), deps.clock.clone())),
    );
    pipeline.register(PipelineState::Searching, Box::new(SearchingHandler::new(deps.clock.clone())));
    pipeline.register(
        PipelineState::Downloading,
        Box::new(DownloadingHandler::new(deps.downloader.clone(), deps.clock.clone())),
    );
    pipeline.register(
        PipelineState::Extracting,
        Box::new(ExtractingHandler::new(deps.transcoder.clone(), deps.clock.clone())),
    );
    pipeline.register(
        PipelineState::MatchingMetadata,
        Box::new(MatchingMetadataHandler::new(deps.metadata.clone(), deps.clock.clone())),
    );
    pipeline.register(
        PipelineState::Tagging,
        Box::new(TaggingHandler::new(deps.tagger.clone(), deps.art.clone(), deps.clock.clone())),
    );
    pipeline.register(
        PipelineState::Storing,
        Box::new(StoringHandler::new(deps.store.clone(), deps.clock.clone())),
    );
    pipeline.register(
        PipelineState::Archiving,
        Box::new(ArchivingHandler::new(deps.store.clone(), deps.clock.clone())),
    );

    pipeline
}
