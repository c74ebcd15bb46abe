//! Builders for the driven adapters and the HTTP state assembled from them.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{
    CommentRepository, DocumentSource, MediaStore, PetitionRepository, ProposalRepository,
    UserRepository, VoteRepository,
};
use crate::domain::{
    CommentsService, MediaService, ProposalsCommandService, ProposalsQueryService, SharingService,
    StaticSiteService, UserAccountsService, VotingService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::media::{FsMediaStore, InMemoryMediaStore};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselPetitionRepository, DieselProposalRepository,
    DieselUserRepository, DieselVoteRepository,
};
use crate::outbound::static_site::{FsDocumentSource, HttpDocumentSource};
use crate::settings::StaticSource;

use super::ServerConfig;

/// Repository ports shared by the domain services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub proposals: Arc<dyn ProposalRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub petitions: Arc<dyn PetitionRepository>,
}

impl Repositories {
    /// Diesel adapters over one shared pool.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            proposals: Arc::new(DieselProposalRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            votes: Arc::new(DieselVoteRepository::new(pool.clone())),
            petitions: Arc::new(DieselPetitionRepository::new(pool.clone())),
        }
    }

    /// Every port served by the same process-local store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            proposals: store.clone(),
            comments: store.clone(),
            votes: store.clone(),
            petitions: store,
        }
    }
}

/// Driven adapters beyond the record repositories.
#[derive(Clone)]
pub struct Adapters {
    pub repositories: Repositories,
    pub media: Arc<dyn MediaStore>,
    pub documents: Arc<dyn DocumentSource>,
}

/// Select adapters from configuration.
///
/// # Errors
///
/// Returns [`io::Error`] when the HTTP document client cannot be built.
pub fn build_adapters(config: &ServerConfig) -> io::Result<Adapters> {
    let repositories = match &config.db_pool {
        Some(pool) => Repositories::postgres(pool),
        None => {
            info!("no database configured; using in-memory store");
            Repositories::in_memory(Arc::new(InMemoryStore::new()))
        }
    };

    let media: Arc<dyn MediaStore> = match &config.media_dir {
        Some(dir) => Arc::new(FsMediaStore::new(dir.clone())),
        None => {
            info!("no media directory configured; media blobs are kept in memory");
            Arc::new(InMemoryMediaStore::new())
        }
    };

    let documents: Arc<dyn DocumentSource> = match &config.static_source {
        StaticSource::Directory(dir) => Arc::new(FsDocumentSource::new(dir.clone())),
        StaticSource::Origin(origin) => Arc::new(
            HttpDocumentSource::new(origin.clone(), config.static_fetch_timeout).map_err(
                |err| io::Error::other(format!("static origin client failed: {err}")),
            )?,
        ),
    };

    Ok(Adapters {
        repositories,
        media,
        documents,
    })
}

/// Wire the domain services onto the given adapters.
pub fn build_ports(adapters: Adapters, clock: Arc<dyn Clock>) -> HttpStatePorts {
    let Adapters {
        repositories:
            Repositories {
                users,
                proposals,
                comments,
                votes,
                petitions,
            },
        media,
        documents,
    } = adapters;

    let proposals_command = ProposalsCommandService::new(
        proposals.clone(),
        users.clone(),
        media.clone(),
        clock.clone(),
    );
    let comments_service = Arc::new(CommentsService::new(
        comments.clone(),
        proposals.clone(),
        users.clone(),
        votes.clone(),
        clock.clone(),
    ));

    HttpStatePorts {
        users: Arc::new(UserAccountsService::new(users.clone(), clock.clone())),
        proposals: Arc::new(ProposalsQueryService::new(
            proposals.clone(),
            votes.clone(),
            petitions,
        )),
        proposals_command: Arc::new(proposals_command),
        voting: Arc::new(VotingService::new(
            proposals.clone(),
            comments,
            users,
            votes,
            clock,
        )),
        comments: comments_service.clone(),
        comments_command: comments_service,
        media: Arc::new(MediaService::new(media.clone())),
        sharing: Arc::new(SharingService::new(proposals, media, documents.clone())),
        static_site: Arc::new(StaticSiteService::new(documents)),
    }
}

/// Build the shared HTTP state for the configured adapters.
///
/// # Errors
///
/// Propagates adapter construction failures from [`build_adapters`].
pub fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let adapters = build_adapters(config)?;
    let ports = build_ports(adapters, Arc::new(DefaultClock));
    Ok(web::Data::new(
        HttpState::new(ports).with_public_base_url(config.public_base_url.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use rstest::rstest;
    use tempfile::TempDir;
    use url::Url;

    fn config(source: StaticSource) -> ServerConfig {
        let addr: SocketAddr = "127.0.0.1:0".parse().expect("addr");
        ServerConfig::new(addr, source)
    }

    #[rstest]
    fn directory_source_builds_without_a_database() {
        let dir = TempDir::new().expect("tempdir");
        let config = config(StaticSource::Directory(dir.path().to_path_buf()));

        let state = build_http_state(&config).expect("state builds");

        assert!(state.public_base_url.is_none());
    }

    #[rstest]
    fn public_base_url_reaches_the_http_state() {
        let dir = TempDir::new().expect("tempdir");
        let base = Url::parse("https://soapbox.example/").expect("url");
        let config = config(StaticSource::Directory(dir.path().to_path_buf()))
            .with_public_base_url(Some(base.clone()));

        let state = build_http_state(&config).expect("state builds");

        assert_eq!(state.public_base_url, Some(base));
    }

    #[rstest]
    fn origin_source_builds_an_http_client() {
        let origin = Url::parse("https://cdn.example.org/").expect("url");
        let config = config(StaticSource::Origin(origin));

        assert!(build_adapters(&config).is_ok());
    }
}
