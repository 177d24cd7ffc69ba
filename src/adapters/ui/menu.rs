//! Implements InputPort. Inquire-based interactive main menu.
//!
//! Each write action sits behind a Confirm gate; cancelling a prompt
//! (Esc/Ctrl-C) aborts the current action, not the program.

use crate::adapters::ui::render;
use crate::domain::{DomainError, NewCourse, NewStudent, validate};
use crate::ports::InputPort;
use crate::usecases::{CourseService, EnrollmentService, ReportService, StudentService};
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Applies the prompt theme for all subsequent inquire prompts.
pub fn apply_theme() {
    let mut cfg = RenderConfig::default_colored();
    cfg.prompt_prefix = Styled::new("»").with_fg(Color::LightCyan);
    cfg.answered_prompt_prefix = Styled::new("»").with_fg(Color::LightGreen);
    inquire::set_global_render_config(cfg);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    RegisterStudent,
    ListStudents,
    AddCourse,
    ListCourses,
    AssignCourse,
    ListRegistrations,
    Statistics,
    EnrollmentReport,
    Exit,
}

const MENU: [MenuAction; 9] = [
    MenuAction::RegisterStudent,
    MenuAction::ListStudents,
    MenuAction::AddCourse,
    MenuAction::ListCourses,
    MenuAction::AssignCourse,
    MenuAction::ListRegistrations,
    MenuAction::Statistics,
    MenuAction::EnrollmentReport,
    MenuAction::Exit,
];

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RegisterStudent => "Register new student",
            Self::ListStudents => "View all students",
            Self::AddCourse => "Add new course",
            Self::ListCourses => "View all courses",
            Self::AssignCourse => "Assign course to student",
            Self::ListRegistrations => "View all registrations",
            Self::Statistics => "Registration statistics",
            Self::EnrollmentReport => "Course enrollment report",
            Self::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Sentinel option that ends the assignment loop.
const FINISH: &str = "« Finish »";

/// Menu adapter. Inquire prompts over the application services.
pub struct MenuInputPort {
    students: Arc<StudentService>,
    courses: Arc<CourseService>,
    enrollment: Arc<EnrollmentService>,
    reports: Arc<ReportService>,
}

impl MenuInputPort {
    pub fn new(
        students: Arc<StudentService>,
        courses: Arc<CourseService>,
        enrollment: Arc<EnrollmentService>,
        reports: Arc<ReportService>,
    ) -> Self {
        Self {
            students,
            courses,
            enrollment,
            reports,
        }
    }

    async fn register_student(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("STUDENT REGISTRATION FORM"));

        let Some(first_name) = text_prompt("First name:")? else {
            return cancelled();
        };
        validate::non_empty("first name", &first_name)?;
        let Some(last_name) = text_prompt("Last name:")? else {
            return cancelled();
        };
        validate::non_empty("last name", &last_name)?;
        let Some(email) = text_prompt("Email:")? else {
            return cancelled();
        };
        validate::email(&email)?;
        let Some(phone) = text_prompt("Phone number:")? else {
            return cancelled();
        };
        validate::phone(&phone)?;
        let Some(dob_raw) = text_prompt("Date of birth (YYYY-MM-DD):")? else {
            return cancelled();
        };
        let date_of_birth = validate::parse_birth_date(&dob_raw)?;

        let new = NewStudent {
            first_name,
            last_name,
            email,
            phone,
            date_of_birth,
        };

        println!();
        println!("Name:          {} {}", new.first_name, new.last_name);
        println!("Email:         {}", new.email);
        println!("Phone:         {}", new.phone);
        println!("Date of birth: {}", new.date_of_birth);
        if !confirm_prompt("Save this student?")? {
            println!("Student registration cancelled.");
            return Ok(());
        }

        let student = self.students.create_student(new).await?;
        println!(
            "Student {} registered with ID {}.",
            student.full_name(),
            student.id
        );
        Ok(())
    }

    async fn list_students(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("ALL REGISTERED STUDENTS"));
        let students = self.students.list_students().await?;
        if students.is_empty() {
            println!("No students found.");
            return Ok(());
        }
        print!("{}", render::students_table(&students));
        Ok(())
    }

    async fn add_course(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("ADD NEW COURSE"));

        let Some(code) = text_prompt("Course code:")? else {
            return cancelled();
        };
        validate::non_empty("course code", &code)?;
        let Some(name) = text_prompt("Course name:")? else {
            return cancelled();
        };
        validate::non_empty("course name", &name)?;
        let Some(credits) = credits_prompt()? else {
            return cancelled();
        };
        validate::credits(credits)?;
        let Some(department) = text_prompt("Department:")? else {
            return cancelled();
        };
        validate::non_empty("department", &department)?;
        let Some(semester) = text_prompt("Semester:")? else {
            return cancelled();
        };
        validate::non_empty("semester", &semester)?;

        let new = NewCourse {
            code,
            name,
            credits,
            department,
            semester,
        };

        println!();
        println!("Course:     {} - {}", new.code, new.name);
        println!("Credits:    {}", new.credits);
        println!("Department: {} | Semester: {}", new.department, new.semester);
        if !confirm_prompt("Save this course?")? {
            println!("Course creation cancelled.");
            return Ok(());
        }

        let course = self.courses.add_course(new).await?;
        println!("Course {} added with ID {}.", course.code, course.id);
        Ok(())
    }

    async fn list_courses(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("COURSE CATALOG"));
        let courses = self.courses.list_courses().await?;
        if courses.is_empty() {
            println!("No courses found.");
            return Ok(());
        }
        print!("{}", render::courses_table(&courses));
        Ok(())
    }

    async fn assign_course(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("COURSE ASSIGNMENT"));

        let students = self.students.list_students().await?;
        if students.is_empty() {
            println!("No students found. Register students first.");
            return Ok(());
        }
        let options: Vec<String> = students
            .iter()
            .map(|s| format!("{} (ID {}) <{}>", s.full_name(), s.id, s.email))
            .collect();
        let Some(choice) = select_prompt("Select a student:", options.clone())? else {
            return cancelled();
        };
        // Map the selected display string back to the student (match full option string).
        let Some(student) = options
            .iter()
            .position(|option| *option == choice)
            .and_then(|idx| students.get(idx))
        else {
            return cancelled();
        };
        println!("Selected student: {} (ID {})", student.full_name(), student.id);

        let current = self.enrollment.courses_for_student(student.id).await?;
        if current.is_empty() {
            println!("No courses currently registered.");
        } else {
            println!("Currently registered courses:");
            print!("{}", render::courses_table(&current));
        }

        loop {
            let catalog = self.courses.list_courses().await?;
            if catalog.is_empty() {
                println!("No courses available. Add courses first.");
                return Ok(());
            }

            let mut options = Vec::with_capacity(catalog.len() + 1);
            for course in &catalog {
                let registered = self
                    .enrollment
                    .is_registered(student.id, course.id)
                    .await?;
                let marker = if registered { " [REGISTERED]" } else { "" };
                options.push(format!(
                    "{} - {} ({} credits, {}){}",
                    course.code, course.name, course.credits, course.department, marker
                ));
            }
            options.push(FINISH.to_string());

            let Some(choice) = select_prompt("Assign which course?", options.clone())? else {
                break;
            };
            if choice == FINISH {
                break;
            }
            let Some(course) = options
                .iter()
                .position(|option| *option == choice)
                .and_then(|idx| catalog.get(idx))
            else {
                break;
            };

            if self.enrollment.is_registered(student.id, course.id).await? {
                println!("Student is already registered for {}.", course.code);
                continue;
            }

            println!();
            println!("Student: {}", student.full_name());
            println!("Course:  {} - {} ({} credits)", course.code, course.name, course.credits);
            if !confirm_prompt("Confirm assignment?")? {
                println!("Assignment cancelled.");
                continue;
            }

            match self.enrollment.register(student.id, course.id).await {
                Ok(_) => println!(
                    "{} has been registered for {}.",
                    student.full_name(),
                    course.code
                ),
                Err(
                    err @ (DomainError::AlreadyRegistered { .. }
                    | DomainError::StudentNotFound(_)
                    | DomainError::CourseNotFound(_)),
                ) => println!("{err}"),
                Err(err) => return Err(err),
            }
        }

        println!("Course assignment completed.");
        Ok(())
    }

    async fn list_registrations(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("STUDENT COURSE REGISTRATIONS"));
        match self.reports.registrations_overview().await? {
            Some(overview) => print!("{}", render::registrations_overview(&overview)),
            None => println!("No student registrations found."),
        }
        Ok(())
    }

    async fn statistics(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("REGISTRATION STATISTICS"));
        match self.reports.registration_stats().await? {
            Some(stats) => print!("{}", render::registration_stats(&stats)),
            None => println!("No registration data available for statistics."),
        }
        Ok(())
    }

    async fn enrollment_report(&self) -> Result<(), DomainError> {
        println!("{}", render::heading("COURSE ENROLLMENT REPORT"));
        match self.reports.enrollment_report().await? {
            Some(report) => print!("{}", render::enrollment_report(&report)),
            None => println!("No enrollment data available."),
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for MenuInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            println!();
            let action = match Select::new("Main menu:", MENU.to_vec()).prompt() {
                Ok(action) => action,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    MenuAction::Exit
                }
                Err(e) => return Err(DomainError::Input(e.to_string())),
            };

            if action == MenuAction::Exit {
                println!("Goodbye.");
                return Ok(());
            }

            let outcome = match action {
                MenuAction::RegisterStudent => self.register_student().await,
                MenuAction::ListStudents => self.list_students().await,
                MenuAction::AddCourse => self.add_course().await,
                MenuAction::ListCourses => self.list_courses().await,
                MenuAction::AssignCourse => self.assign_course().await,
                MenuAction::ListRegistrations => self.list_registrations().await,
                MenuAction::Statistics => self.statistics().await,
                MenuAction::EnrollmentReport => self.enrollment_report().await,
                MenuAction::Exit => Ok(()),
            };

            // A failed action is reported and the menu continues; nothing was
            // partially written (each operation is a single insert/select).
            if let Err(err) = outcome {
                if matches!(err, DomainError::Store(_)) {
                    error!(error = %err, "store failure during menu action");
                }
                println!("{err}");
            }
        }
    }
}

fn cancelled() -> Result<(), DomainError> {
    println!("Action cancelled.");
    Ok(())
}

/// Text prompt, trimmed; `None` means the operator cancelled.
fn text_prompt(message: &str) -> Result<Option<String>, DomainError> {
    match Text::new(message).prompt() {
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

fn credits_prompt() -> Result<Option<u32>, DomainError> {
    match CustomType::<u32>::new("Credits:")
        .with_error_message("Please enter a whole number")
        .prompt()
    {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

fn select_prompt(message: &str, options: Vec<String>) -> Result<Option<String>, DomainError> {
    match Select::new(message, options).prompt() {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

/// Single-key y/n confirmation gate before every write.
fn confirm_prompt(message: &str) -> Result<bool, DomainError> {
    match Confirm::new(message).with_default(false).prompt() {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}
