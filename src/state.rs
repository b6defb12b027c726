use crate::config::{Config, CredentialSource};
use crate::corpus::Corpus;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::search::LexicalEngine;
use crate::tools::ToolRegistry;
use crate::web::{HtmlExtractor, HttpFetcher, ReqwestFetcher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Everything here is immutable after construction, so handlers share it
/// through `Arc` without locking.
pub struct AppState {
    pub corpus: Arc<Corpus>,
    pub engine: Arc<LexicalEngine>,
    pub registry: Arc<ToolRegistry>,
    pub fetcher: Arc<dyn HttpFetcher>,
    pub extractor: Arc<HtmlExtractor>,
    pub credentials: CredentialSource,
    /// False until [`AppState::mark_ready`] is called by whoever serves the router.
    pub ready: AtomicBool,
    pub config: Arc<Config>,
}

impl AppState {
    /// Load the corpus (embedded or `CORPUS_PATH`) and build the reqwest
    /// fetcher. Search credentials are read from the environment per call.
    pub fn new(config: Config) -> Result<Self> {
        let corpus = Corpus::load_or_embedded(config.corpus_path.as_deref())?;
        let fetcher = ReqwestFetcher::new(config.http_timeout())?;

        Self::with_parts(
            config,
            corpus,
            Arc::new(fetcher),
            CredentialSource::Environment,
        )
    }

    /// Assemble state from explicit collaborators.
    pub fn with_parts(
        config: Config,
        corpus: Corpus,
        fetcher: Arc<dyn HttpFetcher>,
        credentials: CredentialSource,
    ) -> Result<Self> {
        let corpus = Arc::new(corpus);
        let engine = LexicalEngine::new(Arc::clone(&corpus));
        let registry = ToolRegistry::builtin();

        tracing::info!(
            entries = corpus.total_items(),
            tools = registry.len(),
            "Search index and tool registry built"
        );

        Ok(Self {
            corpus,
            engine: Arc::new(engine),
            registry: Arc::new(registry),
            fetcher,
            extractor: Arc::new(HtmlExtractor::new()?),
            credentials,
            ready: AtomicBool::new(false),
            config: Arc::new(config),
        })
    }

    /// A dispatcher borrowing this state for one request.
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(
            &self.engine,
            &self.registry,
            self.fetcher.as_ref(),
            &self.extractor,
            &self.credentials,
        )
    }

    /// Flip readiness once the router is built and about to serve.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
        tracing::info!("State marked ready");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}
