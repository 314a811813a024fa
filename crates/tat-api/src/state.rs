//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tat_core::config::AppConfig;
use tat_core::Result;
use tat_extractor::{AnalysisSession, HeuristicParser, Pipeline};
use tat_parser::FileLoader;
use tat_sample::SampleTextGenerator;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Single-flight guard shared by every operation
    pub session: AnalysisSession,
    /// Annotation pipeline
    pub pipeline: Pipeline,
    /// Sample text source
    pub sampler: SampleTextGenerator,
    /// Upload validation and parsing
    pub loader: FileLoader,
}

impl AppState {
    /// Build state from config; fails only when the LLM client cannot be built
    pub fn new(config: AppConfig) -> Result<Self> {
        let sampler = SampleTextGenerator::from_config(&config.llm)?;
        Ok(Self::with_sampler(config, sampler))
    }

    /// Build state with an explicit sample generator
    pub fn with_sampler(config: AppConfig, sampler: SampleTextGenerator) -> Self {
        let pipeline = Pipeline::from_config(Arc::new(HeuristicParser::new()), &config.analysis);
        let loader = FileLoader::from_config(&config.upload);

        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            session: AnalysisSession::new(),
            pipeline,
            sampler,
            loader,
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_sampler(AppConfig::default(), SampleTextGenerator::offline())
    }
}
