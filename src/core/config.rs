use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cms: CmsConfig,
    pub contact: ContactConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub environment: Environment,
    pub site_url: String,
    pub template_dir: String,
}

/// Connection settings for the headless CMS
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// Base URL without the `/api` suffix (e.g. "https://cms.example.com")
    pub url: String,
    /// Optional read token sent as a bearer credential
    pub api_token: Option<String>,
    /// Per-request timeout for CMS calls
    pub timeout: Duration,
    /// Image shown when a section has no media
    pub default_image: String,
}

/// Contact form throttling and delivery settings
#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub max_requests: u32,
    pub window: Duration,
    pub sweep_interval: Duration,
    pub sweep_enabled: bool,
    pub mail_to: Option<String>,
    /// Outgoing mail server; messages are only logged when absent
    pub smtp: Option<SmtpConfig>,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mail_to: String,
    pub mail_from: String,
}

impl SmtpConfig {
    const DEFAULT_PORT: u16 = 587;
    const IMPLICIT_TLS_PORT: u16 = 465;

    /// Port 465 speaks TLS from the first byte, every other port upgrades with STARTTLS
    pub fn implicit_tls(&self) -> bool {
        self.port == Self::IMPLICIT_TLS_PORT
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("mail_to", &self.mail_to)
            .field("mail_from", &self.mail_from)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let app = AppConfig::from_env()?;
        let cms = CmsConfig::from_env(app.environment)?;
        let contact = ContactConfig::from_env(app.environment)?;

        Ok(Config {
            app,
            cms,
            contact,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = Environment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let site_url =
            env::var("SITE_URL").unwrap_or_else(|_| "https://beicapelli.com".to_string());

        let template_dir =
            env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates/site".to_string());

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            environment,
            site_url,
            template_dir,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CmsConfig {
    const DEFAULT_URL: &'static str = "http://localhost:1337";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env(environment: Environment) -> Result<Self, String> {
        let url = env::var("CMS_URL").ok().filter(|s| !s.is_empty());
        let url = Self::resolve_url(url, environment)?;

        let api_token = env::var("CMS_API_TOKEN").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("CMS_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CMS_TIMEOUT_SECS must be a valid number".to_string())?;

        let default_image =
            env::var("CMS_DEFAULT_IMAGE").unwrap_or_else(|_| "/placeholder.svg".to_string());

        Ok(Self {
            url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            default_image,
        })
    }

    /// Production requires an explicit HTTPS CMS endpoint
    fn resolve_url(url: Option<String>, environment: Environment) -> Result<String, String> {
        match url {
            Some(url) => {
                if environment.is_production() && !url.starts_with("https://") {
                    return Err("CMS_URL must use HTTPS in production".to_string());
                }
                Ok(url.trim_end_matches('/').to_string())
            }
            None if environment.is_production() => {
                Err("CMS_URL environment variable is required in production".to_string())
            }
            None => Ok(Self::DEFAULT_URL.to_string()),
        }
    }
}

impl ContactConfig {
    const DEFAULT_MAX_REQUESTS: u32 = 5;
    const DEFAULT_WINDOW_SECS: u64 = 15 * 60;
    const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

    pub fn from_env(environment: Environment) -> Result<Self, String> {
        let max_requests = env::var("CONTACT_RATE_LIMIT_MAX")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUESTS.to_string())
            .parse::<u32>()
            .map_err(|_| "CONTACT_RATE_LIMIT_MAX must be a valid number".to_string())?;

        let window_secs = env::var("CONTACT_RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_WINDOW_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CONTACT_RATE_LIMIT_WINDOW_SECS must be a valid number".to_string())?;

        let sweep_interval_secs = env::var("RATE_LIMIT_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "RATE_LIMIT_SWEEP_INTERVAL_SECS must be a valid number".to_string())?;

        // The sweeper is off in production unless explicitly enabled
        let sweep_enabled = match env::var("RATE_LIMIT_SWEEP_ENABLED") {
            Ok(v) => v
                .parse::<bool>()
                .map_err(|_| "RATE_LIMIT_SWEEP_ENABLED must be true or false".to_string())?,
            Err(_) => !environment.is_production(),
        };

        let lookup = |key: &str| env::var(key).ok().filter(|s| !s.trim().is_empty());
        let mail_to = lookup("MAIL_TO").or_else(|| lookup("CONTACT_MAIL_TO"));
        let smtp = SmtpConfig::from_lookup(lookup)?;

        Ok(Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            sweep_enabled,
            mail_to,
            smtp,
        })
    }
}

impl SmtpConfig {
    /// `None` when `SMTP_HOST` is unset; a half-configured server is an error
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, String> {
        let Some(host) = lookup("SMTP_HOST") else {
            return Ok(None);
        };

        let port = match lookup("SMTP_PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| "SMTP_PORT must be a valid port number".to_string())?,
            None => Self::DEFAULT_PORT,
        };

        let required =
            |key: &str| format!("{} environment variable is required with SMTP_HOST", key);
        let username = lookup("SMTP_USER").ok_or_else(|| required("SMTP_USER"))?;
        let password = lookup("SMTP_PASS").ok_or_else(|| required("SMTP_PASS"))?;
        let mail_to = lookup("MAIL_TO")
            .or_else(|| lookup("CONTACT_MAIL_TO"))
            .ok_or_else(|| required("MAIL_TO"))?;
        let mail_from = lookup("MAIL_FROM").unwrap_or_else(|| username.clone());

        Ok(Some(Self {
            host: host.trim().to_string(),
            port,
            username,
            password,
            mail_to: mail_to.trim().to_string(),
            mail_from: mail_from.trim().to_string(),
        }))
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Bei Capelli API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Public endpoints of the Bei Capelli website".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
