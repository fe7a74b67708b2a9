use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key).map(|v| v.to_lowercase()) {
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
        _ => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub chunking: ChunkingConfig,
    pub limits: QuizLimits,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `QUIZGEN_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("QUIZGEN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            chunking: ChunkingConfig::from_env_profiled(p),
            limits: QuizLimits::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  chunking:    max_chars={}, enabled={}, min_text_chars={}, tie_break={}",
            self.chunking.chunk_max_chars,
            self.chunking.chunking_enabled,
            self.chunking.min_text_chars,
            self.chunking.tie_break.as_str()
        );
        tracing::info!(
            "  limits:      questions={}..={}, max_file_size={}",
            self.limits.min_questions_per_quiz,
            self.limits.max_questions_per_quiz,
            self.limits.max_file_size
        );
        tracing::info!(
            "  llm:         provider={}, configured={}, concurrency={}",
            self.llm.provider,
            self.llm.is_configured(),
            self.llm.concurrency
        );
        tracing::info!("  ollama:      url={}", self.ollama.url);
    }

    /// Limits and processing settings a client needs before building a request.
    pub fn limits_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "max_questions": self.limits.max_questions_per_quiz,
            "min_questions": self.limits.min_questions_per_quiz,
            "max_file_size": self.limits.max_file_size,
            "max_file_size_mb": self.limits.max_file_size as f64 / (1024.0 * 1024.0),
            "allowed_file_types": self.limits.allowed_file_types,
            "ai_provider": self.llm.provider,
            "ai_model": self.llm.active_model(&self.ollama),
            "min_text_length": self.chunking.min_text_chars,
            "max_input_chars": self.chunking.chunk_max_chars,
            "chunking_enabled": self.chunking.chunking_enabled,
        })
    }
}

// ── Chunking / allocation ─────────────────────────────────────

/// How ties between equal fractional remainders are broken when splitting a
/// segment's questions across types and difficulty levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Earlier-listed tags always win ties.
    #[default]
    FirstListed,
    /// The winning start position advances by one per segment, so leftover
    /// units spread across tags over a multi-segment document.
    Rotating,
}

impl TieBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::FirstListed => "first_listed",
            TieBreak::Rotating => "rotating",
        }
    }

    fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "rotating" | "rotate" => TieBreak::Rotating,
            "first_listed" | "first-listed" | "first" => TieBreak::FirstListed,
            other => {
                tracing::warn!(value = %other, "unknown ALLOCATION_TIE_BREAK, using first_listed");
                TieBreak::FirstListed
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per segment handed to the generator (default: 4000).
    pub chunk_max_chars: usize,
    /// When false the whole text is one segment regardless of length.
    pub chunking_enabled: bool,
    /// Shortest trimmed input accepted for generation (default: 50).
    pub min_text_chars: usize,
    pub tie_break: TieBreak,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_max_chars: 4000,
            chunking_enabled: true,
            min_text_chars: 50,
            tie_break: TieBreak::FirstListed,
        }
    }
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            chunk_max_chars: profiled_env_usize(p, "CHUNK_MAX_CHARS", defaults.chunk_max_chars),
            chunking_enabled: profiled_env_bool(p, "ENABLE_TEXT_CHUNKING", defaults.chunking_enabled),
            min_text_chars: profiled_env_usize(p, "MIN_TEXT_CHARS", defaults.min_text_chars),
            tie_break: profiled_env_opt(p, "ALLOCATION_TIE_BREAK")
                .map(|v| TieBreak::parse_or_default(&v))
                .unwrap_or_default(),
        }
    }
}

// ── Request limits ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizLimits {
    pub max_questions_per_quiz: u32,
    pub min_questions_per_quiz: u32,
    /// Upload ceiling in bytes (default: 10 MiB).
    pub max_file_size: usize,
    pub allowed_file_types: Vec<String>,
}

impl Default for QuizLimits {
    fn default() -> Self {
        Self {
            max_questions_per_quiz: 40,
            min_questions_per_quiz: 1,
            max_file_size: 10 * 1024 * 1024,
            allowed_file_types: vec!["pdf".into(), "docx".into(), "txt".into()],
        }
    }
}

impl QuizLimits {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        let allowed_file_types = profiled_env_opt(p, "ALLOWED_FILE_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_file_types);
        Self {
            max_questions_per_quiz: profiled_env_u32(p, "MAX_QUESTIONS_PER_QUIZ", defaults.max_questions_per_quiz),
            min_questions_per_quiz: profiled_env_u32(p, "MIN_QUESTIONS_PER_QUIZ", defaults.min_questions_per_quiz),
            max_file_size: profiled_env_usize(p, "MAX_FILE_SIZE", defaults.max_file_size),
            allowed_file_types,
        }
    }

    /// Reject counts outside `min..=max`. Nothing is clamped.
    pub fn check_question_count(&self, requested: u32) -> Result<(), ValidationError> {
        if requested < self.min_questions_per_quiz || requested > self.max_questions_per_quiz {
            return Err(ValidationError::QuestionCountOutOfRange {
                min: self.min_questions_per_quiz,
                max: self.max_questions_per_quiz,
                actual: requested,
            });
        }
        Ok(())
    }

    /// Validate an upload's extension and size. Returns the lowercased extension.
    pub fn check_upload(&self, filename: &str, size: usize) -> Result<String, ValidationError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if ext.is_empty() || !self.allowed_file_types.iter().any(|t| t == &ext) {
            return Err(ValidationError::UnsupportedFileType {
                file_type: ext,
                allowed: self.allowed_file_types.join(", "),
            });
        }
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(ext)
    }
}

// ── LLM (Gemini / OpenAI) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "openai", "ollama"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on in-flight per-segment generation calls.
    pub concurrency: usize,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "gemini"),
            gemini_api_key: profiled_env_opt(p, "GOOGLE_GEMINI_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", "gemini-1.5-flash"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            temperature: profiled_env_or(p, "LLM_TEMPERATURE", "0.7")
                .parse()
                .unwrap_or(0.7),
            max_tokens: profiled_env_u32(p, "LLM_MAX_TOKENS", 2000),
            concurrency: profiled_env_usize(p, "GENERATION_CONCURRENCY", 4).max(1),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" | "google" => self.gemini_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }

    pub fn active_model<'a>(&'a self, ollama: &'a OllamaConfig) -> &'a str {
        match self.provider.as_str() {
            "openai" => &self.openai_model,
            "ollama" => &ollama.model,
            _ => &self.gemini_model,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
        }
    }
}
