//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_studydesk_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum StudyDeskError {
            $($variant(String),)*
        }

        impl StudyDeskError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(StudyDeskError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(StudyDeskError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(StudyDeskError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl StudyDeskError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        StudyDeskError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_studydesk_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    BackendConfig("E003", "Backend Configuration Error"),
    RemoteService("E004", "Remote Service Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl StudyDeskError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为"记录不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, StudyDeskError::NotFound(_))
    }
}

impl fmt::Display for StudyDeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for StudyDeskError {}

// 为常见的错误类型实现 From trait
impl From<reqwest::Error> for StudyDeskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StudyDeskError::Serialization(err.to_string())
        } else {
            StudyDeskError::RemoteService(err.to_string())
        }
    }
}

impl From<std::io::Error> for StudyDeskError {
    fn from(err: std::io::Error) -> Self {
        StudyDeskError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for StudyDeskError {
    fn from(err: serde_json::Error) -> Self {
        StudyDeskError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for StudyDeskError {
    fn from(err: chrono::ParseError) -> Self {
        StudyDeskError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudyDeskError>;
