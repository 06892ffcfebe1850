//! 表单字段解析
//!
//! 表单结构体的字段都是 `Option<String>`，这里负责去空白、判空和类型转换。

/// 必填文本：去掉首尾空白后非空
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 必填密码：原样保留，不去空白
pub fn required_password(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// 必填整数 ID
pub fn required_id(value: &Option<String>) -> Option<i64> {
    required(value).and_then(|s| s.parse::<i64>().ok())
}

/// 必填整数
pub fn required_i32(value: &Option<String>) -> Option<i32> {
    required(value).and_then(|s| s.parse::<i32>().ok())
}

/// 必填 UUID，返回规范化的小写形式
pub fn required_uuid(value: &Option<String>) -> Option<String> {
    required(value)
        .and_then(|s| uuid::Uuid::parse_str(s).ok())
        .map(|id| id.to_string())
}

/// 可选文本：缺失或空白时为 None
pub fn optional_trimmed(value: &Option<String>) -> Option<String> {
    required(value).map(str::to_string)
}

/// 三态字段：缺失为 None（不修改），空白为 `Some(None)`（置空），否则为 `Some(Some(v))`
pub fn tri_state(value: &Option<String>) -> Option<Option<&str>> {
    value.as_deref().map(|s| {
        let s = s.trim();
        if s.is_empty() { None } else { Some(s) }
    })
}

/// 复选框 / 布尔字段
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}
