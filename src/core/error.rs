//! Failures the converter can run into.
//!
//! Every variant except [`ConverterError::Startup`] is recoverable: it is
//! rendered as a dismissible alert and the previous state is kept. The
//! `Display` text of each variant is the message shown to the user.

use thiserror::Error;

/// Message shown when the provider cannot be reached or answers with a non-2xx status.
pub const CONNECTION_FAILED: &str = "Sua conexão falhou. Não foi possível obter as informações.";

/// Message shown for provider error codes missing from the lookup table.
pub const UNKNOWN_API_ERROR: &str = "Não foi possivel obter as informações.";

/// Message shown when a payload carries no `conversion_rates`.
pub const MISSING_CONVERSION_RATES: &str =
    "O objeto deve conter a propriedade \"conversion_rates\"";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConverterError {
    /// The HTTP request failed or came back with a non-success status.
    #[error("{}", CONNECTION_FAILED)]
    Connection,

    /// The provider answered with `result: "error"`.
    #[error("{message}")]
    Api {
        /// Raw `error-type` field, when the provider sent one.
        error_type: Option<String>,
        message: String,
    },

    /// A fetched payload lacked `conversion_rates`.
    #[error("{}", MISSING_CONVERSION_RATES)]
    Validation,

    /// The selected currency has no entry in the current rate table.
    #[error("A moeda \"{0}\" não possui taxa de conversão disponível.")]
    MissingRate(String),

    /// The rate table holds a value that is not a number.
    #[error("A taxa de conversão para \"{code}\" é inválida: {value}")]
    InvalidRate { code: String, value: String },

    /// The typed amount is not a number.
    #[error("O valor \"{0}\" não é um número válido.")]
    InvalidAmount(String),

    /// More than one option of a currency select is marked as selected.
    #[error("Mais de uma moeda está selecionada: {}", .0.join(", "))]
    AmbiguousSelection(Vec<String>),

    /// A required widget element could not be located.
    #[error("Required element [data-js=\"{0}\"] is missing")]
    Startup(String),
}

impl ConverterError {
    /// Builds an [`ConverterError::Api`] from the provider's `error-type` field.
    pub fn from_error_type(error_type: Option<&str>) -> Self {
        ConverterError::Api {
            error_type: error_type.map(str::to_string),
            message: api_error_message(error_type).to_string(),
        }
    }
}

/// Maps the provider's `error-type` codes to user-facing text.
pub fn api_error_message(error_type: Option<&str>) -> &'static str {
    match error_type {
        Some("unsupported-code") => "O tipo da moeda não existe em nosso banco de dados.",
        Some("malformed-request") => {
            "O endpoint do seu request deve seguir a seguinte estrutura: https://v6.exchangerate-api.com/v6/YOUR-API-KEY/latest/USD"
        }
        Some("invalid-key") => "Chave de API invalida.",
        Some("inactive-account") => "Seu endereço de email não foi confirmado.",
        Some("quota-reached") => "Sua conta atingiu o limite de solicitações.",
        _ => UNKNOWN_API_ERROR,
    }
}
