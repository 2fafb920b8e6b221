//! Plain-text rendering for stdout.

use registrar::domain::{Course, Registration, Student};

pub(crate) fn course_table(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses found.");
        return;
    }
    println!("{:<8} {:<36} {:<18} {:>7}  INSTRUCTOR", "CODE", "NAME", "SCHEDULE", "SEATS");
    for course in courses {
        println!(
            "{:<8} {:<36} {:<18} {:>3}/{:<3}  {}",
            course.code,
            truncate(&course.name, 36),
            course.schedule.as_deref().unwrap_or("-"),
            course.enrolled,
            course.capacity,
            course.instructor
        );
    }
}

pub(crate) fn course_detail(course: &Course) {
    println!("{} - {}", course.code, course.name);
    if !course.description.is_empty() {
        println!("  {}", course.description);
    }
    println!("  Department:    {}", course.department);
    println!("  Instructor:    {}", course.instructor);
    println!("  Term:          {} {}", course.semester, course.year);
    println!("  Credits:       {}", course.credits);
    println!("  Schedule:      {}", course.schedule.as_deref().unwrap_or("TBA"));
    println!("  Location:      {}", course.location);
    println!("  Enrollment:    {}/{} ({} seats left)", course.enrolled, course.capacity, course.seats_left());
    if !course.prerequisites.is_empty() {
        println!("  Prerequisites: {}", course.prerequisites.join(", "));
    }
}

pub(crate) fn student_detail(student: &Student) {
    println!("{} ({})", student.name(), student.username);
    println!("  Id:       {}", student.id);
    println!("  Email:    {}", student.email);
    println!("  Major:    {}", student.major);
    println!("  Year:     {}", student.year);
    println!("  GPA:      {:.2}", student.gpa);
    println!("  Phone:    {}", student.phone.as_deref().unwrap_or("-"));
    println!("  Address:  {}", student.address.as_deref().unwrap_or("-"));
    println!("  Joined:   {}", student.created_at.format("%Y-%m-%d"));
}

pub(crate) fn roster_line(registration: &Registration, student: Option<&Student>) {
    let who = student.map_or_else(|| registration.student_id.clone(), |s| format!("{} ({})", s.name(), s.username));
    println!(
        "{:<14} {:<32} {:<6} {}",
        registration.id,
        who,
        registration.grade.as_deref().unwrap_or("-"),
        registration.registered_at.format("%Y-%m-%d %H:%M")
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
