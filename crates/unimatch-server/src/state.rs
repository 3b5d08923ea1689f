use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use unimatch_config::{KnowledgeBase, Settings};
use unimatch_engine::BaselineModel;
use unimatch_llm::{AdmissionScorer, LlmScorer};

pub struct ServerState {
    pub kb: Arc<KnowledgeBase>,
    pub scorer: Option<Arc<dyn AdmissionScorer>>,
    pub baseline: BaselineModel,
    /// `USE_LLM` as configured, independent of whether a client could be built.
    pub use_llm: bool,
}

impl ServerState {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        scorer: Option<Arc<dyn AdmissionScorer>>,
        use_llm: bool,
    ) -> Self {
        Self {
            kb,
            scorer,
            baseline: BaselineModel::new(),
            use_llm,
        }
    }

    /// Loads the knowledge base and builds the LLM scorer when configured.
    pub fn init(settings: &Settings) -> Result<Self> {
        let kb = KnowledgeBase::load_from_dir(Path::new(&settings.kb_dir))
            .with_context(|| format!("failed to load knowledge base from {}", settings.kb_dir))?;
        let kb = Arc::new(kb);

        let scorer = match (settings.use_llm, settings.llm.api_key.is_empty()) {
            (false, _) => {
                info!("LLM scorer disabled by USE_LLM, using baseline model");
                None
            }
            (true, true) => {
                warn!("LLM scorer disabled: OPENAI_API_KEY not configured");
                None
            }
            (true, false) => match LlmScorer::new(&settings.llm, kb.clone()) {
                Ok(s) => Some(Arc::new(s) as Arc<dyn AdmissionScorer>),
                Err(e) => {
                    warn!("LLM scorer disabled: {}", e);
                    None
                }
            },
        };

        Ok(Self::new(kb, scorer, settings.use_llm))
    }

    pub fn llm_enabled(&self) -> bool {
        self.use_llm && self.scorer.is_some()
    }

    pub fn calibrator_loaded(&self) -> bool {
        self.scorer
            .as_ref()
            .map_or(self.kb.calibrator.is_some(), |s| s.calibrator_loaded())
    }
}
