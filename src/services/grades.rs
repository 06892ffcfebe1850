//! 成绩汇总
//!
//! 只有已评分的作业参与计算。加权平均只统计权重为正的作业；
//! 没有任何已评分作业带权重时退化为算术平均。结果保留两位小数。

use std::collections::HashMap;

use crate::models::assignments::{Assignment, GradeSummary, GradedAssignment, StudentGrade};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 将某次选课的成绩合并到课程作业上
pub fn merge_grades(assignments: &[Assignment], grades: &[StudentGrade]) -> Vec<GradedAssignment> {
    let by_assignment: HashMap<&str, &StudentGrade> = grades
        .iter()
        .map(|g| (g.assignment_id.as_str(), g))
        .collect();

    assignments
        .iter()
        .map(|a| {
            let grade = by_assignment.get(a.assignment_id.as_str());
            GradedAssignment {
                assignment_id: a.assignment_id.clone(),
                assignment_name: a.assignment_name.clone(),
                weight: a.weight,
                due_date: a.due_date,
                grade: grade.and_then(|g| g.grade),
                feedback: grade.and_then(|g| g.feedback.clone()),
            }
        })
        .collect()
}

pub fn summarize(items: &[GradedAssignment]) -> GradeSummary {
    let graded: Vec<(f64, Option<f64>)> = items
        .iter()
        .filter_map(|a| a.grade.map(|g| (g, a.weight)))
        .collect();

    let covered_weight: f64 = graded.iter().filter_map(|(_, w)| *w).sum();

    let (weighted_sum, weight_total) = graded
        .iter()
        .filter_map(|(g, w)| w.filter(|w| *w > 0.0).map(|w| (g * w, w)))
        .fold((0.0, 0.0), |(s, t), (gw, w)| (s + gw, t + w));

    let average = if weight_total > 0.0 {
        Some(weighted_sum / weight_total)
    } else if !graded.is_empty() {
        Some(graded.iter().map(|(g, _)| g).sum::<f64>() / graded.len() as f64)
    } else {
        None
    };

    GradeSummary {
        average: average.map(round2),
        graded_count: graded.len(),
        assignment_count: items.len(),
        covered_weight: round2(covered_weight),
    }
}

/// 以 ECTS 加权的总平均，忽略没有平均分或学分不为正的课程
pub fn overall_average(courses: &[(i32, Option<f64>)]) -> Option<f64> {
    let (sum, ects) = courses
        .iter()
        .filter_map(|(ects, avg)| avg.filter(|_| *ects > 0).map(|a| (a * *ects as f64, *ects)))
        .fold((0.0, 0), |(s, t), (v, e)| (s + v, t + e));

    (ects > 0).then(|| round2(sum / ects as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(grade: Option<f64>, weight: Option<f64>) -> GradedAssignment {
        GradedAssignment {
            assignment_id: "a".into(),
            assignment_name: "A".into(),
            weight,
            due_date: None,
            grade,
            feedback: None,
        }
    }

    #[test]
    fn test_weighted_average() {
        let items = [
            item(Some(2.0), Some(0.4)),
            item(Some(4.0), Some(0.6)),
            item(None, Some(0.5)),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.average, Some(3.2));
        assert_eq!(summary.graded_count, 2);
        assert_eq!(summary.assignment_count, 3);
        assert_eq!(summary.covered_weight, 1.0);
    }

    #[test]
    fn test_unweighted_falls_back_to_mean() {
        let items = [item(Some(1.0), None), item(Some(2.0), Some(0.0))];
        let summary = summarize(&items);
        assert_eq!(summary.average, Some(1.5));
        assert_eq!(summary.covered_weight, 0.0);
    }

    #[test]
    fn test_weighted_ignores_unweighted_graded() {
        let items = [item(Some(1.0), Some(0.5)), item(Some(5.0), None)];
        assert_eq!(summarize(&items).average, Some(1.0));
    }

    #[test]
    fn test_no_grades() {
        let summary = summarize(&[item(None, Some(1.0))]);
        assert_eq!(summary.average, None);
        assert_eq!(summary.graded_count, 0);
        assert_eq!(summarize(&[]), GradeSummary::default());
    }

    #[test]
    fn test_rounding() {
        let items = [item(Some(1.0), None), item(Some(2.0), None), item(Some(2.0), None)];
        assert_eq!(summarize(&items).average, Some(1.67));
    }

    #[test]
    fn test_merge_grades() {
        let assignment = |id: &str| Assignment {
            assignment_id: id.into(),
            assignment_name: id.to_uppercase(),
            course_id: Some(1),
            weight: Some(0.5),
            due_date: None,
            created_at: None,
            updated_at: None,
        };
        let grades = vec![StudentGrade {
            student_grade_id: Some(1),
            enrollment_id: 9,
            assignment_id: "b".into(),
            grade: Some(2.3),
            feedback: Some("good".into()),
            updated_at: None,
        }];
        let merged = merge_grades(&[assignment("a"), assignment("b")], &grades);
        assert_eq!(merged[0].grade, None);
        assert_eq!(merged[1].grade, Some(2.3));
        assert_eq!(merged[1].feedback.as_deref(), Some("good"));
    }

    #[test]
    fn test_overall_average_weights_by_ects() {
        assert_eq!(
            overall_average(&[(5, Some(2.0)), (10, Some(1.0)), (3, None)]),
            Some(1.33)
        );
        assert_eq!(overall_average(&[(0, Some(2.0))]), None);
        assert_eq!(overall_average(&[]), None);
    }
}
