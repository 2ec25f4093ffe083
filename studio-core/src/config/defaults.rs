//! Built-in configuration used when no `config/router.toml` exists.

/// Gemini and Grok for text, Pollinations as the keyless image default, Imagen
/// and Grok Image for the premium tiers. Image requests may name the premium
/// providers by their family name (`gemini`, `grok`).
pub const DEFAULT_ROUTER_TOML: &str = r#"
[server]
bind = "127.0.0.1:8000"
rate_limit_requests = 60
rate_limit_window_secs = 60

[routing]
deadline_secs = 90
default_timeout_secs = 30

[routing.image_tiers]
fast = ["pollinations"]
balanced = ["pollinations"]
high = ["gemini-image", "pollinations"]
ultra = ["grok-image", "gemini-image", "pollinations"]

[routing.hints.generate-image]
gemini = "gemini-image"
grok = "grok-image"

[[providers]]
id = "gemini"
type = "gemini"
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"
api_path = "v1beta/models"
model = "gemini-2.5-flash"
capabilities = ["text"]
priority = 10
cost_tier = "free-tier"

[[providers]]
id = "grok"
type = "openai"
endpoint = "https://api.x.ai"
api_key = "GROK_API_KEY"
api_path = "/v1/chat/completions"
model = "grok-beta"
capabilities = ["text"]
priority = 20
cost_tier = "paid"
system_prompt = "You are Grok, a helpful AI assistant for the Smart Content Studio application."

[[providers]]
id = "pollinations"
type = "pollinations"
endpoint = "https://image.pollinations.ai"
model = "flux"
capabilities = ["image"]
priority = 10
cost_tier = "free"

[[providers]]
id = "gemini-image"
type = "gemini"
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"
api_path = "v1beta/models"
model = "imagen-3.0-generate-002"
capabilities = ["image"]
priority = 30
cost_tier = "free-tier"
timeout_secs = 90

[[providers]]
id = "grok-image"
type = "openai"
endpoint = "https://api.x.ai"
api_key = "GROK_IMAGE_API_KEY"
image_path = "/v1/images/generations"
model = "grok-2-image"
capabilities = ["image"]
priority = 40
cost_tier = "paid"
timeout_secs = 120
"#;
