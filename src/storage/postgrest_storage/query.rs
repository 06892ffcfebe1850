//! REST 查询参数构造

use std::fmt::Display;

/// 单表查询
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: &'static str,
    params: Vec<(String, String)>,
    order: Vec<String>,
}

impl TableQuery {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), compact(columns)));
        self
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.into(), format!("eq.{value}")));
        self
    }

    pub fn neq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.into(), format!("neq.{value}")));
        self
    }

    /// 空列表时不加条件
    pub fn not_in(mut self, column: &str, values: &[i64]) -> Self {
        if !values.is_empty() {
            let list = values
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.params.push((column.into(), format!("not.in.({list})")));
        }
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    /// 对嵌入资源排序，例如 `assignments` 的 `due_date`
    pub fn order_embedded(mut self, resource: &str, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push((format!("{resource}.order"), format!("{column}.{direction}")));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.params.push(("limit".into(), limit.to_string()));
        self
    }

    pub fn on_conflict(mut self, columns: &str) -> Self {
        self.params.push(("on_conflict".into(), compact(columns)));
        self
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        if !self.order.is_empty() {
            params.push(("order".into(), self.order.join(",")));
        }
        params
    }
}

/// 去掉列清单中的空白，方便多行书写嵌入查询
fn compact(columns: &str) -> String {
    columns.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 解析 `Content-Range` 中的总数，例如 `0-9/42`、`*/0`
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    header
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(q: &TableQuery) -> Vec<(String, String)> {
        q.params()
    }

    #[test]
    fn test_filters_and_order() {
        let q = TableQuery::new("courses")
            .select("course_id, course_name,\n instructor:instructors(instructor_id)")
            .eq("instructor_id", 3)
            .order("course_name", true)
            .order("course_id", false)
            .limit(1);
        assert_eq!(q.table(), "courses");
        assert_eq!(
            pairs(&q),
            vec![
                (
                    "select".to_string(),
                    "course_id,course_name,instructor:instructors(instructor_id)".to_string()
                ),
                ("instructor_id".to_string(), "eq.3".to_string()),
                ("limit".to_string(), "1".to_string()),
                ("order".to_string(), "course_name.asc,course_id.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_not_in_and_neq() {
        let q = TableQuery::new("courses")
            .not_in("course_id", &[1, 2, 5])
            .not_in("course_id", &[])
            .neq("user_id", "u-1");
        assert_eq!(
            pairs(&q),
            vec![
                ("course_id".to_string(), "not.in.(1,2,5)".to_string()),
                ("user_id".to_string(), "neq.u-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_on_conflict() {
        let q = TableQuery::new("student_grades").on_conflict("enrollment_id, assignment_id");
        assert_eq!(
            pairs(&q),
            vec![(
                "on_conflict".to_string(),
                "enrollment_id,assignment_id".to_string()
            )]
        );
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(parse_content_range_total("0-9/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-9/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
