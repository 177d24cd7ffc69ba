//! Reporting aggregates. Pure functions over an immutable snapshot of the
//! enriched view; the UI layer renders the returned structures.
//!
//! Every function maps an empty snapshot to `None` so callers report
//! "no data" instead of dividing by zero.

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::entities::{Course, EnrichedRegistration, Student};

/// One student's slice of the enriched view, with credit totals.
#[derive(Debug, Clone)]
pub struct StudentRollup {
    pub student: Student,
    /// The student's rows in snapshot order (course code ascending).
    pub rows: Vec<EnrichedRegistration>,
    pub course_count: usize,
    pub total_credits: u32,
}

/// All registrations grouped per student, plus overall totals.
#[derive(Debug, Clone)]
pub struct RegistrationsOverview {
    pub rollups: Vec<StudentRollup>,
    pub total_registrations: usize,
    pub average_courses_per_student: f64,
}

/// Registration count for one department or semester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub registrations: usize,
}

/// Registration count for one credit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditBucket {
    pub credits: u32,
    pub registrations: usize,
}

/// Department/semester/credit breakdowns of all registrations.
#[derive(Debug, Clone)]
pub struct RegistrationStats {
    /// Sorted by descending count, then department name.
    pub by_department: Vec<GroupCount>,
    /// Sorted by descending count, then semester name.
    pub by_semester: Vec<GroupCount>,
    /// Sorted by ascending credit value.
    pub by_credits: Vec<CreditBucket>,
}

/// Enrollment headcount for one course.
#[derive(Debug, Clone)]
pub struct CourseEnrollment {
    pub course: Course,
    pub enrolled: usize,
}

/// Per-course enrollment leaderboard.
#[derive(Debug, Clone)]
pub struct EnrollmentReport {
    /// Sorted by descending headcount, then course code.
    pub courses: Vec<CourseEnrollment>,
    pub most_popular: CourseEnrollment,
    /// Absent when only one course has enrollments.
    pub least_popular: Option<CourseEnrollment>,
}

/// Group rows by `key`, preserving first-occurrence order of groups and the
/// snapshot order of members within each group.
fn group_by<K, F>(rows: &[EnrichedRegistration], key: F) -> Vec<(K, Vec<&EnrichedRegistration>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&EnrichedRegistration) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&EnrichedRegistration>)> = Vec::new();
    for row in rows {
        let k = key(row);
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(row),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![row]));
            }
        }
    }
    groups
}

fn count_by<F>(rows: &[EnrichedRegistration], key: F) -> Vec<GroupCount>
where
    F: Fn(&EnrichedRegistration) -> String,
{
    group_by(rows, key)
        .into_iter()
        .map(|(key, members)| GroupCount {
            key,
            registrations: members.len(),
        })
        .collect()
}

/// Per-student rollups plus overall totals. `None` on an empty snapshot.
pub fn registrations_overview(rows: &[EnrichedRegistration]) -> Option<RegistrationsOverview> {
    if rows.is_empty() {
        return None;
    }
    let groups = group_by(rows, |r| r.registration.student_id);
    let total_registrations = rows.len();
    let average_courses_per_student = total_registrations as f64 / groups.len() as f64;

    let rollups = groups
        .into_iter()
        .map(|(_, members)| {
            let student = members[0].student.clone();
            let course_count = members.len();
            let total_credits = members.iter().map(|r| r.course.credits).sum();
            StudentRollup {
                student,
                rows: members.into_iter().cloned().collect(),
                course_count,
                total_credits,
            }
        })
        .collect();

    Some(RegistrationsOverview {
        rollups,
        total_registrations,
        average_courses_per_student,
    })
}

/// Department, semester and credit-hour breakdowns. `None` on an empty snapshot.
pub fn registration_stats(rows: &[EnrichedRegistration]) -> Option<RegistrationStats> {
    if rows.is_empty() {
        return None;
    }

    let mut by_department = count_by(rows, |r| r.course.department.clone());
    by_department.sort_by(|a, b| {
        b.registrations
            .cmp(&a.registrations)
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut by_semester = count_by(rows, |r| r.course.semester.clone());
    by_semester.sort_by(|a, b| {
        b.registrations
            .cmp(&a.registrations)
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut by_credits: Vec<CreditBucket> = group_by(rows, |r| r.course.credits)
        .into_iter()
        .map(|(credits, members)| CreditBucket {
            credits,
            registrations: members.len(),
        })
        .collect();
    by_credits.sort_by_key(|bucket| bucket.credits);

    Some(RegistrationStats {
        by_department,
        by_semester,
        by_credits,
    })
}

/// Per-course leaderboard with most/least popular. `None` on an empty snapshot.
pub fn enrollment_report(rows: &[EnrichedRegistration]) -> Option<EnrollmentReport> {
    if rows.is_empty() {
        return None;
    }

    let mut courses: Vec<CourseEnrollment> = group_by(rows, |r| r.registration.course_id)
        .into_iter()
        .map(|(_, members)| CourseEnrollment {
            course: members[0].course.clone(),
            enrolled: members.len(),
        })
        .collect();
    courses.sort_by(|a, b| {
        b.enrolled
            .cmp(&a.enrolled)
            .then_with(|| a.course.code.cmp(&b.course.code))
    });

    let most_popular = courses[0].clone();
    let least_popular = if courses.len() > 1 {
        courses.last().cloned()
    } else {
        None
    };

    Some(EnrollmentReport {
        courses,
        most_popular,
        least_popular,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Registration, Student};
    use chrono::{DateTime, NaiveDate, Utc};

    fn student(id: i64, first: &str, last: &str) -> Student {
        Student {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@x.com", first.to_lowercase()),
            phone: "0712345678".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            registered_at: ts(0),
        }
    }

    fn course(id: i64, code: &str, credits: u32, department: &str, semester: &str) -> Course {
        Course {
            id,
            code: code.to_string(),
            name: format!("{code} name"),
            credits,
            department: department.to_string(),
            semester: semester.to_string(),
        }
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn row(reg_id: i64, student: Student, course: Course) -> EnrichedRegistration {
        EnrichedRegistration {
            registration: Registration {
                id: reg_id,
                student_id: student.id,
                course_id: course.id,
                enrolled_at: ts(reg_id),
                grade: None,
            },
            student,
            course,
        }
    }

    #[test]
    fn test_overview_rollup_counts_and_credits() {
        let alice = student(1, "Alice", "Smith");
        let rows = vec![
            row(1, alice.clone(), course(10, "CS101", 3, "CS", "Fall2024")),
            row(2, alice.clone(), course(11, "CS102", 4, "CS", "Fall2024")),
        ];

        let overview = registrations_overview(&rows).unwrap();
        assert_eq!(overview.rollups.len(), 1);
        let rollup = &overview.rollups[0];
        assert_eq!(rollup.course_count, 2);
        assert_eq!(rollup.total_credits, 7);
        assert_eq!(rollup.student.id, 1);
    }

    #[test]
    fn test_overview_totals_and_average() {
        let alice = student(1, "Alice", "Smith");
        let bob = student(2, "Bob", "Young");
        let rows = vec![
            row(1, alice.clone(), course(10, "CS101", 3, "CS", "Fall2024")),
            row(2, alice.clone(), course(11, "CS102", 4, "CS", "Fall2024")),
            row(3, bob.clone(), course(10, "CS101", 3, "CS", "Fall2024")),
        ];

        let overview = registrations_overview(&rows).unwrap();
        assert_eq!(overview.total_registrations, 3);
        assert_eq!(overview.rollups.len(), 2);
        assert!((overview.average_courses_per_student - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_department_counts_descending() {
        let alice = student(1, "Alice", "Smith");
        let bob = student(2, "Bob", "Young");
        let carol = student(3, "Carol", "Zane");
        let rows = vec![
            row(1, alice.clone(), course(10, "CS101", 3, "CS", "Fall2024")),
            row(2, bob.clone(), course(10, "CS101", 3, "CS", "Fall2024")),
            row(3, carol.clone(), course(11, "CS102", 4, "CS", "Fall2024")),
            row(4, alice.clone(), course(20, "MATH201", 3, "MATH", "Fall2024")),
        ];

        let stats = registration_stats(&rows).unwrap();
        assert_eq!(
            stats.by_department,
            vec![
                GroupCount {
                    key: "CS".to_string(),
                    registrations: 3
                },
                GroupCount {
                    key: "MATH".to_string(),
                    registrations: 1
                },
            ]
        );
    }

    #[test]
    fn test_group_ties_break_on_key() {
        let alice = student(1, "Alice", "Smith");
        let bob = student(2, "Bob", "Young");
        let rows = vec![
            row(1, alice.clone(), course(20, "MATH201", 3, "MATH", "Spring2025")),
            row(2, bob.clone(), course(10, "CS101", 3, "CS", "Fall2024")),
        ];

        let stats = registration_stats(&rows).unwrap();
        // Equal counts: CS sorts before MATH regardless of snapshot order.
        assert_eq!(stats.by_department[0].key, "CS");
        assert_eq!(stats.by_semester[0].key, "Fall2024");
    }

    #[test]
    fn test_credit_buckets_ascending() {
        let alice = student(1, "Alice", "Smith");
        let bob = student(2, "Bob", "Young");
        let rows = vec![
            row(1, alice.clone(), course(11, "CS102", 4, "CS", "Fall2024")),
            row(2, alice.clone(), course(20, "MATH201", 3, "MATH", "Fall2024")),
            row(3, bob.clone(), course(11, "CS102", 4, "CS", "Fall2024")),
        ];

        let stats = registration_stats(&rows).unwrap();
        assert_eq!(
            stats.by_credits,
            vec![
                CreditBucket {
                    credits: 3,
                    registrations: 1
                },
                CreditBucket {
                    credits: 4,
                    registrations: 2
                },
            ]
        );
    }

    #[test]
    fn test_enrollment_most_and_least_popular() {
        let a = course(10, "CS101", 3, "CS", "Fall2024");
        let b = course(20, "MATH201", 3, "MATH", "Fall2024");
        let mut rows = Vec::new();
        for i in 0..5 {
            rows.push(row(i, student(i, &format!("S{i}"), "Smith"), a.clone()));
        }
        rows.push(row(10, student(10, "Late", "Young"), b.clone()));

        let report = enrollment_report(&rows).unwrap();
        assert_eq!(report.most_popular.course.code, "CS101");
        assert_eq!(report.most_popular.enrolled, 5);
        let least = report.least_popular.unwrap();
        assert_eq!(least.course.code, "MATH201");
        assert_eq!(least.enrolled, 1);
    }

    #[test]
    fn test_enrollment_single_course_has_no_least_popular() {
        let a = course(10, "CS101", 3, "CS", "Fall2024");
        let rows = vec![row(1, student(1, "Alice", "Smith"), a)];

        let report = enrollment_report(&rows).unwrap();
        assert_eq!(report.most_popular.enrolled, 1);
        assert!(report.least_popular.is_none());
    }

    #[test]
    fn test_empty_snapshot_reports_no_data() {
        assert!(registrations_overview(&[]).is_none());
        assert!(registration_stats(&[]).is_none());
        assert!(enrollment_report(&[]).is_none());
    }
}
