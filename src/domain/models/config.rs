use serde::{Deserialize, Serialize};

/// Main configuration structure for the field report agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Completion service configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Retry policy for the completion service
    #[serde(default)]
    pub retry: RetryConfig,

    /// Downstream collaborator endpoints
    #[serde(default)]
    pub services: ServicesConfig,

    /// Extraction pipeline and dialogue settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OpenAI-compatible completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompletionConfig {
    /// Base URL, e.g. `http://127.0.0.1:6325/v1`
    #[serde(default = "default_completion_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Value of the `reasoning_options_mode` extra body field, if any
    #[serde(default)]
    pub reasoning_mode: Option<String>,
}

fn default_completion_url() -> String {
    "http://127.0.0.1:6325/v1".to_string()
}

fn default_api_key() -> String {
    "nova-proxy".to_string()
}

fn default_model() -> String {
    "yagpt".to_string()
}

const fn default_max_tokens() -> u32 {
    3000
}

const fn default_timeout_secs() -> u64 {
    120
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_url(),
            api_key: default_api_key(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            reasoning_mode: Some("ENABLED_HIDDEN".to_string()),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Downstream HTTP collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServicesConfig {
    /// Data service (message sink and template lookup)
    #[serde(default = "default_data_service_url")]
    pub data_service_url: String,

    /// Messenger bot service (send_message / send_image)
    #[serde(default = "default_messenger_url")]
    pub messenger_url: String,

    /// File service holding pending report messages
    #[serde(default = "default_pending_store_url")]
    pub pending_store_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_service_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_data_service_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_messenger_url() -> String {
    "http://localhost:52101".to_string()
}

fn default_pending_store_url() -> String {
    "http://localhost:8003".to_string()
}

const fn default_service_timeout_secs() -> u64 {
    30
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            data_service_url: default_data_service_url(),
            messenger_url: default_messenger_url(),
            pending_store_url: default_pending_store_url(),
            timeout_secs: default_service_timeout_secs(),
        }
    }
}

/// Extraction pipeline and dialogue settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// chrono format used when an empty date cell is filled with today
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Non-system turns kept in conversational history outside a clarification
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Sent when the completion service authored no question
    #[serde(default = "default_fallback_question")]
    pub fallback_question: String,

    /// Sent once a report has been accepted
    #[serde(default = "default_confirmation")]
    pub confirmation: String,
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

const fn default_max_history_turns() -> usize {
    20
}

fn default_fallback_question() -> String {
    "Не удалось распознать все обязательные поля отчёта. Пожалуйста, уточните недостающие данные \
     или пришлите исправленную таблицу."
        .to_string()
}

fn default_confirmation() -> String {
    "Спасибо! Отчёт принят.".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            max_history_turns: default_max_history_turns(),
            fallback_question: default_fallback_question(),
            confirmation: default_confirmation(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation of log files: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
