use crate::handlers::{resolve_course, resolve_student};
use crate::render;
use anyhow::{Context, Result};
use registrar::Registrar;
use registrar::domain::Student;

pub(crate) async fn enroll(registrar: &Registrar, student: &str, course_code: &str) -> Result<()> {
    let student = resolve_student(registrar, student).await?;
    let course = resolve_course(registrar, course_code).await?;

    let registration = registrar.engine().enroll(&student.id, &course.id).await?;
    println!("Enrolled {} in {} (registration {})", student.username, course.code, registration.id);
    Ok(())
}

pub(crate) async fn drop(registrar: &Registrar, student: &str, course_code: &str) -> Result<()> {
    let student = resolve_student(registrar, student).await?;
    let course = resolve_course(registrar, course_code).await?;

    if registrar.engine().drop(&student.id, &course.id).await? {
        println!("Dropped {} from {}", student.username, course.code);
    } else {
        println!("{} is not enrolled in {}", student.username, course.code);
    }
    Ok(())
}

pub(crate) async fn my_courses(registrar: &Registrar, student: &str) -> Result<()> {
    let student = resolve_student(registrar, student).await?;
    let courses = registrar.engine().student_courses(&student.id).await;

    println!("Courses for {} ({}):", student.name(), student.username);
    render::course_table(&courses);
    let credits: u32 = courses.iter().map(|c| u32::from(c.credits)).sum();
    println!("Total credits: {credits}");
    Ok(())
}

pub(crate) async fn grade(registrar: &Registrar, registration_id: &str, grade: &str) -> Result<()> {
    let registration = registrar.engine().update_grade(registration_id, grade).await?;
    println!(
        "Recorded grade {} for {} in {}",
        registration.grade.as_deref().unwrap_or_default(),
        registration.student_id,
        registration.course_id
    );
    Ok(())
}

pub(crate) async fn roster(registrar: &Registrar, course_code: &str) -> Result<()> {
    let course = resolve_course(registrar, course_code).await?;
    let registrations = registrar.engine().course_registrations(&course.id).await;

    println!("{} - {} ({}/{})", course.code, course.name, course.enrolled, course.capacity);
    if registrations.is_empty() {
        println!("No students enrolled.");
        return Ok(());
    }
    for registration in &registrations {
        let student: Option<Student> = registrar
            .accounts()
            .find_by_id(&registration.student_id)
            .await
            .with_context(|| format!("Loading student {}", registration.student_id))?;
        render::roster_line(registration, student.as_ref());
    }
    Ok(())
}

pub(crate) async fn reconcile(registrar: &Registrar) -> Result<()> {
    let report = registrar.engine().reconcile().await?;
    if report.is_clean() {
        println!("All {} course counters are consistent.", report.courses_checked);
        return Ok(());
    }
    for fix in &report.corrections {
        println!("{}: {} -> {}", fix.code, fix.previous, fix.actual);
    }
    println!("Corrected {} of {} courses.", report.corrections.len(), report.courses_checked);
    Ok(())
}
