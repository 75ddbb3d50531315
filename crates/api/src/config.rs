use arcana_core::session::ReadingKind;

/// Server configuration loaded from environment variables.
///
/// Networking fields have development defaults; credentials and the
/// per-flow price ids are required so a misconfigured deployment fails at
/// startup instead of at the first checkout.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`; result generation
    /// waits on the generation service).
    pub request_timeout_secs: u64,

    /// Public base URL this server is reachable at, used to build the
    /// payment success and cancel URLs.
    pub public_base_url: String,

    /// Payment provider secret key.
    pub stripe_secret_key: String,
    /// Provider price ids, one product per flow.
    pub price_tarot: String,
    pub price_astro: String,
    pub price_dream: String,

    /// Text-generation service.
    pub oracle_base_url: String,
    pub oracle_api_key: String,
    pub oracle_model: String,

    /// Geocoder (Nominatim-compatible) base URL and the user agent its
    /// usage policy requires.
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    /// Timezone lookup service; unset means a fixed UTC offset of zero.
    pub timezone_base_url: Option<String>,
    /// Ephemeris computation service.
    pub ephemeris_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                               |
    /// |------------------------|---------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                             |
    /// | `PORT`                 | `3000`                                |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`               |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                                  |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000`               |
    /// | `STRIPE_SECRET_KEY`    | required                              |
    /// | `PRICE_TAROT`          | required                              |
    /// | `PRICE_ASTRO`          | required                              |
    /// | `PRICE_DREAM`          | required                              |
    /// | `ORACLE_BASE_URL`      | `https://api.openai.com`              |
    /// | `ORACLE_API_KEY`       | required                              |
    /// | `ORACLE_MODEL`         | `gpt-4o-mini`                         |
    /// | `GEOCODER_BASE_URL`    | `https://nominatim.openstreetmap.org` |
    /// | `GEOCODER_USER_AGENT`  | `arcana-api`                          |
    /// | `TIMEZONE_BASE_URL`    | unset (fixed UTC)                     |
    /// | `EPHEMERIS_BASE_URL`   | required                              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let stripe_secret_key =
            std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set");
        let price_tarot = std::env::var("PRICE_TAROT").expect("PRICE_TAROT must be set");
        let price_astro = std::env::var("PRICE_ASTRO").expect("PRICE_ASTRO must be set");
        let price_dream = std::env::var("PRICE_DREAM").expect("PRICE_DREAM must be set");

        let oracle_base_url =
            std::env::var("ORACLE_BASE_URL").unwrap_or_else(|_| "https://api.openai.com".into());
        let oracle_api_key = std::env::var("ORACLE_API_KEY").expect("ORACLE_API_KEY must be set");
        let oracle_model =
            std::env::var("ORACLE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

        let geocoder_base_url = std::env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into());
        let geocoder_user_agent =
            std::env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| "arcana-api".into());
        let timezone_base_url = std::env::var("TIMEZONE_BASE_URL").ok();
        let ephemeris_base_url =
            std::env::var("EPHEMERIS_BASE_URL").expect("EPHEMERIS_BASE_URL must be set");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            stripe_secret_key,
            price_tarot,
            price_astro,
            price_dream,
            oracle_base_url,
            oracle_api_key,
            oracle_model,
            geocoder_base_url,
            geocoder_user_agent,
            timezone_base_url,
            ephemeris_base_url,
        }
    }

    /// The provider price id for a flow's product.
    pub fn price_for(&self, kind: ReadingKind) -> &str {
        match kind {
            ReadingKind::Tarot => &self.price_tarot,
            ReadingKind::Astro => &self.price_astro,
            ReadingKind::Dream => &self.price_dream,
        }
    }
}
