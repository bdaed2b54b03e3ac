use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub mail: MailConfig,
    pub upload: UploadConfig,
    pub security: SecurityConfig,
    pub routes: RouteConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub tls: bool,
    /// Fixed sender address; never derived from user input.
    pub from_address: String,
    pub from_name: String,
    /// Where form submissions are delivered.
    pub company_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_image_bytes: usize,
    pub max_document_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret for the admin gate. `None` means gated routes always
    /// deny, so a missing key fails closed.
    pub admin_api_key: Option<String>,
    /// Allowed cross-origin sources. Empty means permissive (development).
    pub cors_origins: Vec<String>,
    /// Whether blog/career mutating routes require the admin key. The source
    /// deployments disagreed on this, so it is configuration; default on.
    pub gate_blog_writes: bool,
    pub gate_career_writes: bool,
}

/// What POST /api/blogs does with a valid submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlogSubmitMode {
    /// Store the post and return it.
    Persist,
    /// Relay the post as an email notification, persist nothing.
    Notify,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub blog_submit_mode: BlogSubmitMode,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.port = v.parse().unwrap_or(self.port);
        }

        // Mail transport
        if let Ok(v) = env::var("SMTP_HOST") {
            self.mail.smtp_host = v;
        }
        if let Ok(v) = env::var("SMTP_PORT") {
            self.mail.smtp_port = v.parse().unwrap_or(self.mail.smtp_port);
        }
        if let Ok(v) = env::var("SMTP_SECURE") {
            self.mail.tls = v.parse().unwrap_or(self.mail.tls);
        }
        if let Ok(v) = env::var("SMTP_USER") {
            // The SMTP user doubles as the default sender address.
            self.mail.from_address = v.clone();
            self.mail.smtp_user = Some(v);
        }
        if let Ok(v) = env::var("SMTP_PASS") {
            self.mail.smtp_pass = Some(v);
        }
        if let Ok(v) = env::var("SMTP_FROM") {
            self.mail.from_address = v;
        }
        if let Ok(v) = env::var("MAIL_FROM_NAME") {
            self.mail.from_name = v;
        }
        if let Ok(v) = env::var("COMPANY_EMAIL") {
            self.mail.company_email = v;
        }

        // Uploads
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.upload.dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOAD_MAX_IMAGE_BYTES") {
            self.upload.max_image_bytes = v.parse().unwrap_or(self.upload.max_image_bytes);
        }
        if let Ok(v) = env::var("UPLOAD_MAX_DOCUMENT_BYTES") {
            self.upload.max_document_bytes = v.parse().unwrap_or(self.upload.max_document_bytes);
        }

        // Security
        if let Ok(v) = env::var("ADMIN_API_KEY") {
            if !v.is_empty() {
                self.security.admin_api_key = Some(v);
            }
        }
        if let Ok(v) = env::var("CORS_ORIGIN") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("GATE_BLOG_WRITES") {
            self.security.gate_blog_writes = v.parse().unwrap_or(self.security.gate_blog_writes);
        }
        if let Ok(v) = env::var("GATE_CAREER_WRITES") {
            self.security.gate_career_writes =
                v.parse().unwrap_or(self.security.gate_career_writes);
        }

        // Routes
        if let Ok(v) = env::var("BLOG_SUBMIT_MODE") {
            self.routes.blog_submit_mode = match v.to_lowercase().as_str() {
                "notify" | "email" => BlogSubmitMode::Notify,
                "persist" | "store" => BlogSubmitMode::Persist,
                _ => self.routes.blog_submit_mode,
            };
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            port: 4000,
            mail: MailConfig {
                smtp_host: "localhost".to_string(),
                smtp_port: 587,
                smtp_user: None,
                smtp_pass: None,
                tls: false,
                from_address: "noreply@localhost".to_string(),
                from_name: "Formgate".to_string(),
                company_email: "inbox@localhost".to_string(),
            },
            upload: UploadConfig {
                dir: PathBuf::from("./uploads"),
                max_image_bytes: 5 * 1024 * 1024,
                max_document_bytes: 6 * 1024 * 1024,
            },
            security: SecurityConfig {
                admin_api_key: None,
                cors_origins: Vec::new(),
                gate_blog_writes: true,
                gate_career_writes: true,
            },
            routes: RouteConfig {
                blog_submit_mode: BlogSubmitMode::Persist,
            },
        }
    }

    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.mail.tls = true;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.port, 4000);
        assert!(config.security.gate_blog_writes);
        assert!(config.security.gate_career_writes);
        assert_eq!(config.routes.blog_submit_mode, BlogSubmitMode::Persist);
        assert!(config.security.admin_api_key.is_none());
        assert!(!config.mail.tls);
    }

    #[test]
    fn production_enables_tls() {
        let config = AppConfig::production();
        assert!(config.mail.tls);
    }
}
