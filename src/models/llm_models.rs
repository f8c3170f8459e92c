//! Well-known gateway model identifiers.
//!
//! Model ids are provider-qualified the way the Meridian gateway expects
//! them. The catalog is a convenience, not a restriction; any id the
//! gateway accepts works in `llms` lists and constraints.

// OpenAI
pub const GPT_4_1: &str = "openai/openai/gpt-4.1";
pub const GPT_4_1_MINI: &str = "openai/openai/gpt-4.1-mini";
pub const GPT_4_1_NANO: &str = "openai/openai/gpt-4.1-nano";
pub const GPT_4O: &str = "openai/openai/gpt-4o";
pub const GPT_4O_MINI: &str = "openai/openai/gpt-4o-mini";

// Anthropic
pub const CLAUDE_3_OPUS: &str = "anthropic/anthropic/claude-3-opus-latest";
pub const CLAUDE_3_5_HAIKU: &str = "anthropic/anthropic/claude-3-5-haiku-latest";
pub const CLAUDE_3_5_SONNET: &str = "anthropic/anthropic/claude-3-5-sonnet-latest";
pub const CLAUDE_3_7_SONNET: &str = "anthropic/anthropic/claude-3-7-sonnet-latest";

// Together
pub const DEEPSEEK_R1: &str = "together/deepseek-ai/DeepSeek-R1";
pub const DEEPSEEK_V3: &str = "together/deepseek-ai/DeepSeek-V3";
pub const LLAMA_3_3_70B: &str = "together/meta-llama/Llama-3.3-70B-Instruct-Turbo";
pub const QWEN_72B: &str = "together/Qwen/Qwen2.5-72B-Instruct-Turbo";

// Gemini
pub const GEMINI_1_5_FLASH: &str = "gemini/gemini/gemini-1.5-flash";
pub const GEMINI_1_5_PRO: &str = "gemini/gemini/gemini-1.5-pro";
pub const GEMINI_2_0_FLASH: &str = "gemini/gemini/gemini-2.0-flash";

/// Every id in the catalog.
pub const ALL_MODELS: &[&str] = &[
    GPT_4_1,
    GPT_4_1_MINI,
    GPT_4_1_NANO,
    GPT_4O,
    GPT_4O_MINI,
    CLAUDE_3_OPUS,
    CLAUDE_3_5_HAIKU,
    CLAUDE_3_5_SONNET,
    CLAUDE_3_7_SONNET,
    DEEPSEEK_R1,
    DEEPSEEK_V3,
    LLAMA_3_3_70B,
    QWEN_72B,
    GEMINI_1_5_FLASH,
    GEMINI_1_5_PRO,
    GEMINI_2_0_FLASH,
];
