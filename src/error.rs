use bigdecimal::BigDecimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ComparisonError>;

/// 比价引擎错误
///
/// 致命错误携带出错的物料/供应商/币种，调用方可以直接展示给用户。
#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("Unknown currency '{currency}'{}", context_suffix(.item_code, .vendor_name))]
    UnknownCurrency {
        currency: String,
        item_code: Option<String>,
        vendor_name: Option<String>,
    },

    #[error("Invalid exchange rate for '{currency}': {rate}")]
    InvalidRate { currency: String, rate: BigDecimal },

    #[error("Quote {vendor_name}/{item_code} failed validation: {}", join_errors(.errors))]
    Validation {
        item_code: String,
        vendor_name: String,
        errors: Vec<ValidationError>,
    },

    #[error("Duplicate quote for item '{item_code}' from vendor '{vendor_name}'")]
    DuplicateQuote {
        item_code: String,
        vendor_name: String,
    },

    #[error("Duplicate item code '{item_code}'")]
    DuplicateItem { item_code: String },

    #[error("Duplicate vendor name '{vendor_name}'")]
    DuplicateVendor { vendor_name: String },

    #[error("Comparison requires at least one item")]
    EmptyItemSet,

    #[error("Invalid tier policy: {0}")]
    InvalidPolicy(String),

    #[error("Missing required columns: {}", .fields.join(", "))]
    MissingColumns { fields: Vec<String> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComparisonError {
    pub fn unknown_currency(currency: impl Into<String>) -> Self {
        ComparisonError::UnknownCurrency {
            currency: currency.into(),
            item_code: None,
            vendor_name: None,
        }
    }

    /// 错误类别 (API 响应中的 error_kind)
    pub fn kind(&self) -> &'static str {
        match self {
            ComparisonError::UnknownCurrency { .. } => "unknown_currency",
            ComparisonError::InvalidRate { .. } => "invalid_rate",
            ComparisonError::Validation { .. } => "validation",
            ComparisonError::DuplicateQuote { .. } => "duplicate_quote",
            ComparisonError::DuplicateItem { .. } => "duplicate_item",
            ComparisonError::DuplicateVendor { .. } => "duplicate_vendor",
            ComparisonError::EmptyItemSet => "empty_item_set",
            ComparisonError::InvalidPolicy(_) => "invalid_policy",
            ComparisonError::MissingColumns { .. } => "missing_columns",
            ComparisonError::NotFound(_) => "not_found",
            ComparisonError::Config(_) => "config",
            ComparisonError::Csv(_) => "csv",
            ComparisonError::Io(_) => "io",
        }
    }

    /// 是否由调用方输入引起
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            ComparisonError::NotFound(_) | ComparisonError::Config(_) | ComparisonError::Io(_)
        )
    }
}

/// 报价结构校验问题 (非致命，默认只剔除该报价)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("unit price must be positive, got {0}")]
    NonPositivePrice(BigDecimal),

    #[error("item quantity must be positive, got {0}")]
    NonPositiveQuantity(BigDecimal),

    #[error("currency '{0}' has no exchange rate")]
    UnknownCurrency(String),

    #[error("total {actual} does not match unit price x quantity = {expected}")]
    TotalMismatch {
        expected: BigDecimal,
        actual: BigDecimal,
    },
}

fn context_suffix(item_code: &Option<String>, vendor_name: &Option<String>) -> String {
    match (item_code, vendor_name) {
        (Some(item), Some(vendor)) => format!(" (item {}, vendor {})", item, vendor),
        (Some(item), None) => format!(" (item {})", item),
        (None, Some(vendor)) => format!(" (vendor {})", vendor),
        (None, None) => String::new(),
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
