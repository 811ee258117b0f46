use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum AffilinkError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    Serialization(String),
}

impl AffilinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AffilinkError::DatabaseConfig(_) => "E001",
            AffilinkError::DatabaseConnection(_) => "E002",
            AffilinkError::DatabaseOperation(_) => "E003",
            AffilinkError::FileOperation(_) => "E004",
            AffilinkError::Validation(_) => "E005",
            AffilinkError::NotFound(_) => "E006",
            AffilinkError::Conflict(_) => "E007",
            AffilinkError::Unauthorized(_) => "E008",
            AffilinkError::Forbidden(_) => "E009",
            AffilinkError::Serialization(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AffilinkError::DatabaseConfig(_) => "Database Configuration Error",
            AffilinkError::DatabaseConnection(_) => "Database Connection Error",
            AffilinkError::DatabaseOperation(_) => "Database Operation Error",
            AffilinkError::FileOperation(_) => "File Operation Error",
            AffilinkError::Validation(_) => "Validation Error",
            AffilinkError::NotFound(_) => "Resource Not Found",
            AffilinkError::Conflict(_) => "Resource Conflict",
            AffilinkError::Unauthorized(_) => "Unauthorized",
            AffilinkError::Forbidden(_) => "Forbidden",
            AffilinkError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AffilinkError::DatabaseConfig(msg) => msg,
            AffilinkError::DatabaseConnection(msg) => msg,
            AffilinkError::DatabaseOperation(msg) => msg,
            AffilinkError::FileOperation(msg) => msg,
            AffilinkError::Validation(msg) => msg,
            AffilinkError::NotFound(msg) => msg,
            AffilinkError::Conflict(msg) => msg,
            AffilinkError::Unauthorized(msg) => msg,
            AffilinkError::Forbidden(msg) => msg,
            AffilinkError::Serialization(msg) => msg,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            AffilinkError::Validation(_) => StatusCode::BAD_REQUEST,
            AffilinkError::NotFound(_) => StatusCode::NOT_FOUND,
            AffilinkError::Conflict(_) => StatusCode::CONFLICT,
            AffilinkError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AffilinkError::Forbidden(_) => StatusCode::FORBIDDEN,
            AffilinkError::DatabaseConfig(_)
            | AffilinkError::DatabaseConnection(_)
            | AffilinkError::DatabaseOperation(_)
            | AffilinkError::FileOperation(_)
            | AffilinkError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AffilinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AffilinkError {}

// 便捷的构造函数
impl AffilinkError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AffilinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AffilinkError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AffilinkError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AffilinkError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AffilinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AffilinkError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AffilinkError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        AffilinkError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        AffilinkError::Forbidden(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AffilinkError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AffilinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        AffilinkError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AffilinkError {
    fn from(err: std::io::Error) -> Self {
        AffilinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AffilinkError {
    fn from(err: serde_json::Error) -> Self {
        AffilinkError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for AffilinkError {
    fn from(err: url::ParseError) -> Self {
        AffilinkError::Validation(format!("Invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AffilinkError>;
