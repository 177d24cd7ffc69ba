//! Fixed-width console tables and report layouts.
//!
//! Pure string builders over domain structures; the menu prints them.

use std::fmt::Write;

use crate::domain::reports::{EnrollmentReport, RegistrationStats, RegistrationsOverview};
use crate::domain::{Course, Student};

const WIDE: usize = 100;

fn rule(c: char, width: usize) -> String {
    c.to_string().repeat(width)
}

/// Boxed section heading used above each action's output.
pub fn heading(title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule('=', WIDE));
    let _ = writeln!(out, "{:^WIDE$}", title);
    let _ = writeln!(out, "{}", rule('=', WIDE));
    out
}

pub fn students_table(students: &[Student]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<15} {:<15} {:<25} {:<15} {:<12}",
        "ID", "First Name", "Last Name", "Email", "Phone", "Birth Date"
    );
    let _ = writeln!(out, "{}", rule('-', 92));
    for s in students {
        let _ = writeln!(
            out,
            "{:<5} {:<15} {:<15} {:<25} {:<15} {:<12}",
            s.id, s.first_name, s.last_name, s.email, s.phone, s.date_of_birth
        );
    }
    let _ = writeln!(out, "{}", rule('-', 92));
    let _ = writeln!(out, "Total students: {}", students.len());
    out
}

pub fn courses_table(courses: &[Course]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<10} {:<30} {:<8} {:<15} {:<12}",
        "ID", "Code", "Course Name", "Credits", "Department", "Semester"
    );
    let _ = writeln!(out, "{}", rule('-', 85));
    for c in courses {
        let _ = writeln!(
            out,
            "{:<5} {:<10} {:<30} {:<8} {:<15} {:<12}",
            c.id, c.code, c.name, c.credits, c.department, c.semester
        );
    }
    let _ = writeln!(out, "{}", rule('-', 85));
    let _ = writeln!(out, "Total courses: {}", courses.len());
    out
}

/// Per-student sections with course lines, then the overall summary.
pub fn registrations_overview(overview: &RegistrationsOverview) -> String {
    let mut out = String::new();
    for rollup in &overview.rollups {
        let s = &rollup.student;
        let _ = writeln!(out, "{}", rule('-', WIDE));
        let _ = writeln!(out, "STUDENT: {} (ID {})", s.full_name(), s.id);
        let _ = writeln!(
            out,
            "  Email: {} | Phone: {} | DOB: {}",
            s.email, s.phone, s.date_of_birth
        );
        let _ = writeln!(out, "{}", rule('-', WIDE));
        let _ = writeln!(
            out,
            "{:<10} {:<30} {:<8} {:<15} {:<12} {:<17} {:<6}",
            "Code", "Course Name", "Credits", "Department", "Semester", "Enrolled", "Grade"
        );
        for row in &rollup.rows {
            let c = &row.course;
            let enrolled = row.registration.enrolled_at.format("%Y-%m-%d %H:%M");
            let grade = row.registration.grade.as_deref().unwrap_or("N/A");
            let _ = writeln!(
                out,
                "{:<10} {:<30} {:<8} {:<15} {:<12} {:<17} {:<6}",
                c.code, c.name, c.credits, c.department, c.semester, enrolled, grade
            );
        }
        let _ = writeln!(
            out,
            "SUMMARY: {} courses registered | {} total credits",
            rollup.course_count, rollup.total_credits
        );
    }
    let _ = writeln!(out, "{}", rule('=', WIDE));
    let _ = writeln!(
        out,
        "Students with registrations: {}",
        overview.rollups.len()
    );
    let _ = writeln!(
        out,
        "Total course registrations:  {}",
        overview.total_registrations
    );
    let _ = writeln!(
        out,
        "Average courses per student: {:.2}",
        overview.average_courses_per_student
    );
    let _ = writeln!(out, "{}", rule('=', WIDE));
    out
}

/// Department, semester and credit-hour breakdowns.
pub fn registration_stats(stats: &RegistrationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "REGISTRATIONS BY DEPARTMENT:");
    let _ = writeln!(out, "{}", rule('-', 40));
    for group in &stats.by_department {
        let _ = writeln!(
            out,
            "{:<25}: {} registrations",
            group.key, group.registrations
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "REGISTRATIONS BY SEMESTER:");
    let _ = writeln!(out, "{}", rule('-', 40));
    for group in &stats.by_semester {
        let _ = writeln!(
            out,
            "{:<25}: {} registrations",
            group.key, group.registrations
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "REGISTRATIONS BY CREDIT HOURS:");
    let _ = writeln!(out, "{}", rule('-', 40));
    for bucket in &stats.by_credits {
        let _ = writeln!(
            out,
            "{:<25}: {} registrations",
            format!("{} credit courses", bucket.credits),
            bucket.registrations
        );
    }
    out
}

/// Enrollment leaderboard with most/least popular lines.
pub fn enrollment_report(report: &EnrollmentReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<30} {:<10} {:<15} {:<8}",
        "Code", "Course Name", "Enrolled", "Department", "Credits"
    );
    let _ = writeln!(out, "{}", rule('-', 78));
    for entry in &report.courses {
        let c = &entry.course;
        let _ = writeln!(
            out,
            "{:<10} {:<30} {:<10} {:<15} {:<8}",
            c.code, c.name, entry.enrolled, c.department, c.credits
        );
    }
    let _ = writeln!(out, "{}", rule('-', 78));
    let _ = writeln!(
        out,
        "Total courses with enrollments: {}",
        report.courses.len()
    );
    let _ = writeln!(
        out,
        "Most popular course:  {} ({} students)",
        report.most_popular.course.code, report.most_popular.enrolled
    );
    if let Some(least) = &report.least_popular {
        let _ = writeln!(
            out,
            "Least popular course: {} ({} students)",
            least.course.code, least.enrolled
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EnrichedRegistration, Registration};
    use crate::domain::reports;
    use chrono::{DateTime, NaiveDate, Utc};

    fn sample_rows() -> Vec<EnrichedRegistration> {
        let student = Student {
            id: 1,
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@x.com".to_string(),
            phone: "0712345678".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            registered_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let course = Course {
            id: 10,
            code: "CS101".to_string(),
            name: "Intro to Programming".to_string(),
            credits: 3,
            department: "CS".to_string(),
            semester: "Fall2024".to_string(),
        };
        vec![EnrichedRegistration {
            registration: Registration {
                id: 1,
                student_id: 1,
                course_id: 10,
                enrolled_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
                grade: None,
            },
            student: student.clone(),
            course,
        }]
    }

    #[test]
    fn test_students_table_lists_and_counts() {
        let rows = sample_rows();
        let table = students_table(&[rows[0].student.clone()]);
        assert!(table.contains("Alice"));
        assert!(table.contains("alice@x.com"));
        assert!(table.contains("Total students: 1"));
    }

    #[test]
    fn test_overview_includes_summary_lines() {
        let rows = sample_rows();
        let overview = reports::registrations_overview(&rows).unwrap();
        let text = registrations_overview(&overview);
        assert!(text.contains("STUDENT: Alice Smith (ID 1)"));
        assert!(text.contains("1 courses registered | 3 total credits"));
        assert!(text.contains("Average courses per student: 1.00"));
        // Grade never assigned in scope.
        assert!(text.contains("N/A"));
    }

    #[test]
    fn test_enrollment_report_omits_least_for_single_course() {
        let rows = sample_rows();
        let report = reports::enrollment_report(&rows).unwrap();
        let text = enrollment_report(&report);
        assert!(text.contains("Most popular course:  CS101 (1 students)"));
        assert!(!text.contains("Least popular"));
    }
}
