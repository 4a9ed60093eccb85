//! Configuration management for the electronic-invoicing bridge

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub company: CompanyConfig,
    pub http: HttpConfig,
    pub app: AppConfig,
}

/// Per-company settings for the remote invoicing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Production environment when true, DIAN enablement (habilitación) otherwise.
    pub is_not_test: bool,
    pub test_set_id: Option<String>,
    /// Park validated invoices in the intermediate `validate` state.
    pub enable_validate_state: bool,
    pub enable_mass_send_print: bool,
    pub include_pdf_attachment: bool,
    pub report_custom_text: Option<String>,
    pub footer_custom_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub log_level: String,
    pub port: u16,
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            company: CompanyConfig {
                api_url: env::var("DIAN_API_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
                api_key: optional_var("DIAN_API_KEY"),
                is_not_test: env::var("DIAN_IS_NOT_TEST")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()?,
                test_set_id: optional_var("DIAN_TEST_SET_ID"),
                enable_validate_state: env::var("DIAN_ENABLE_VALIDATE_STATE")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()?,
                enable_mass_send_print: env::var("DIAN_ENABLE_MASS_SEND_PRINT")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()?,
                include_pdf_attachment: env::var("DIAN_INCLUDE_PDF_ATTACHMENT")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()?,
                report_custom_text: optional_var("DIAN_REPORT_HEADER_TEXT"),
                footer_custom_text: optional_var("DIAN_REPORT_FOOTER_TEXT"),
            },
            http: HttpConfig {
                request_timeout_seconds: env::var("DIAN_API_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            app: AppConfig {
                environment: env::var("ENVIRONMENT")
                    .unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "info".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
            },
        })
    }
}

impl CompanyConfig {
    /// Configuration with everything off, pointing at `api_url`.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: Some(api_key.into()),
            is_not_test: false,
            test_set_id: None,
            enable_validate_state: false,
            enable_mass_send_print: false,
            include_pdf_attachment: true,
            report_custom_text: None,
            footer_custom_text: None,
        }
    }

    pub fn token(&self) -> crate::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::configuration("Debe configurar un token para poder facturar electrónicamente"))
    }

    pub fn base_url(&self) -> crate::Result<&str> {
        let url = self.api_url.trim_end_matches('/');
        if url.is_empty() {
            return Err(AppError::configuration(
                "No ha configurado una URL API para la facturación electrónica",
            ));
        }
        Ok(url)
    }

    pub fn require_test_set_id(&self) -> crate::Result<&str> {
        self.test_set_id.as_deref().ok_or_else(|| {
            AppError::configuration(
                "No ha configurado un 'TestSetId'. Sin este no puede hacer pruebas para habilitación.",
            )
        })
    }
}
