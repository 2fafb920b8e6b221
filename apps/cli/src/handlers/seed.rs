use anyhow::Result;
use registrar::Registrar;
use registrar::features::catalog::NewCourse;
use registrar::features::enrollment::EnrollmentError;
use registrar::features::identity::NewStudent;
use tracing::info;

const SAMPLE_PASSWORD: &str = "password123";

/// id, first, last, username, major, year, gpa, phone, address
type StudentRow = (&'static str, &'static str, &'static str, &'static str, &'static str, u8, f64, &'static str, &'static str);

const STUDENTS: [StudentRow; 8] = [
    ("S001", "John", "Doe", "johndoe", "Computer Science", 3, 3.8, "555-0101", "123 Main St"),
    ("S002", "Jane", "Smith", "janesmith", "Mathematics", 2, 3.9, "555-0102", "456 Oak Ave"),
    ("S003", "Bob", "Johnson", "bobjohnson", "Physics", 4, 3.5, "555-0103", "789 Pine Rd"),
    ("S004", "Alice", "Williams", "alicew", "Computer Science", 1, 3.7, "555-0104", "321 Elm St"),
    ("S005", "Charlie", "Brown", "charlieb", "Engineering", 3, 3.6, "555-0105", "654 Maple Dr"),
    ("S006", "Diana", "Davis", "dianad", "Biology", 2, 3.85, "555-0106", "987 Cedar Ln"),
    ("S007", "Eve", "Martinez", "evem", "Chemistry", 4, 3.4, "555-0107", "147 Birch Way"),
    ("S008", "Frank", "Garcia", "frankg", "Mathematics", 1, 3.75, "555-0108", "258 Spruce Ct"),
];

struct CourseRow {
    id: &'static str,
    code: &'static str,
    name: &'static str,
    description: &'static str,
    credits: u8,
    department: &'static str,
    instructor: &'static str,
    schedule: &'static str,
    location: &'static str,
    capacity: u32,
    prerequisites: &'static [&'static str],
}

const COURSES: [CourseRow; 10] = [
    CourseRow {
        id: "C001",
        code: "CS101",
        name: "Introduction to Programming",
        description: "Learn the fundamentals of programming",
        credits: 3,
        department: "Computer Science",
        instructor: "Dr. Alan Turing",
        schedule: "MWF 09:00-10:00",
        location: "Room 101",
        capacity: 30,
        prerequisites: &[],
    },
    CourseRow {
        id: "C002",
        code: "CS201",
        name: "Data Structures and Algorithms",
        description: "Advanced programming concepts and algorithm design",
        credits: 4,
        department: "Computer Science",
        instructor: "Dr. Donald Knuth",
        schedule: "TTh 10:30-12:00",
        location: "Room 102",
        capacity: 25,
        prerequisites: &["CS101"],
    },
    CourseRow {
        id: "C003",
        code: "MATH201",
        name: "Calculus I",
        description: "Differential and integral calculus",
        credits: 4,
        department: "Mathematics",
        instructor: "Dr. Isaac Newton",
        schedule: "MWF 11:00-12:00",
        location: "Room 201",
        capacity: 35,
        prerequisites: &[],
    },
    CourseRow {
        id: "C004",
        code: "MATH202",
        name: "Calculus II",
        description: "Advanced calculus and series",
        credits: 4,
        department: "Mathematics",
        instructor: "Dr. Leonhard Euler",
        schedule: "TTh 13:00-14:30",
        location: "Room 202",
        capacity: 30,
        prerequisites: &["MATH201"],
    },
    CourseRow {
        id: "C005",
        code: "PHYS101",
        name: "Physics I",
        description: "Mechanics and thermodynamics",
        credits: 4,
        department: "Physics",
        instructor: "Dr. Albert Einstein",
        schedule: "MWF 14:00-15:00",
        location: "Room 301",
        capacity: 28,
        prerequisites: &[],
    },
    CourseRow {
        id: "C006",
        code: "ENG101",
        name: "English Composition",
        description: "Academic writing and critical thinking",
        credits: 3,
        department: "English",
        instructor: "Dr. William Shakespeare",
        schedule: "TTh 09:00-10:30",
        location: "Room 401",
        capacity: 25,
        prerequisites: &[],
    },
    CourseRow {
        id: "C007",
        code: "CHEM101",
        name: "General Chemistry",
        description: "Introduction to chemical principles",
        credits: 4,
        department: "Chemistry",
        instructor: "Dr. Marie Curie",
        schedule: "MWF 10:00-11:00",
        location: "Lab 101",
        capacity: 24,
        prerequisites: &[],
    },
    CourseRow {
        id: "C008",
        code: "BIO101",
        name: "Introduction to Biology",
        description: "Cell biology and genetics",
        credits: 4,
        department: "Biology",
        instructor: "Dr. Charles Darwin",
        schedule: "TTh 11:00-12:30",
        location: "Lab 201",
        capacity: 30,
        prerequisites: &[],
    },
    CourseRow {
        id: "C009",
        code: "CS301",
        name: "Database Systems",
        description: "Database design and SQL programming",
        credits: 3,
        department: "Computer Science",
        instructor: "Dr. Edgar Codd",
        schedule: "MW 15:00-16:30",
        location: "Room 103",
        capacity: 20,
        prerequisites: &["CS201"],
    },
    CourseRow {
        id: "C010",
        code: "CS401",
        name: "Software Engineering",
        description: "Software development methodologies and practices",
        credits: 3,
        department: "Computer Science",
        instructor: "Dr. Fred Brooks",
        schedule: "TTh 15:00-16:30",
        location: "Room 104",
        capacity: 22,
        prerequisites: &["CS201"],
    },
];

const ENROLLMENTS: [(&str, &str); 22] = [
    ("S001", "C001"),
    ("S001", "C002"),
    ("S001", "C009"),
    ("S002", "C003"),
    ("S002", "C004"),
    ("S002", "C001"),
    ("S003", "C005"),
    ("S003", "C003"),
    ("S003", "C007"),
    ("S004", "C001"),
    ("S004", "C003"),
    ("S004", "C006"),
    ("S005", "C005"),
    ("S005", "C003"),
    ("S005", "C007"),
    ("S006", "C008"),
    ("S006", "C007"),
    ("S006", "C003"),
    ("S007", "C007"),
    ("S007", "C005"),
    ("S008", "C003"),
    ("S008", "C006"),
];

/// Loads the sample data set. Records that already exist are left alone, so running the
/// command twice is harmless.
pub(crate) async fn load_sample_data(registrar: &Registrar) -> Result<()> {
    let accounts = registrar.accounts();
    let mut added = 0;
    for (id, first, last, username, major, year, gpa, phone, address) in STUDENTS {
        if accounts.find_by_id(id).await?.is_some() {
            continue;
        }
        let mut student = accounts
            .create_student(NewStudent {
                id: Some(id.to_owned()),
                first_name: first.to_owned(),
                last_name: last.to_owned(),
                email: format!("{}.{}@university.edu", first.to_lowercase(), last.to_lowercase()),
                username: username.to_owned(),
                password: SAMPLE_PASSWORD.to_owned(),
                major: major.to_owned(),
                year,
                phone: Some(phone.to_owned()),
                address: Some(address.to_owned()),
            })
            .await?;
        student.gpa = gpa;
        accounts.update(student).await?;
        added += 1;
    }
    println!("Students: {added} added, {} already present", STUDENTS.len() - added);

    let catalog = registrar.catalog();
    let mut added = 0;
    for row in &COURSES {
        if catalog.find_by_id(row.id).await?.is_some() {
            continue;
        }
        catalog
            .create_course(NewCourse {
                id: Some(row.id.to_owned()),
                code: row.code.to_owned(),
                name: row.name.to_owned(),
                description: row.description.to_owned(),
                credits: row.credits,
                department: row.department.to_owned(),
                instructor: row.instructor.to_owned(),
                semester: "Fall".to_owned(),
                year: 2024,
                schedule: Some(row.schedule.to_owned()),
                location: row.location.to_owned(),
                capacity: row.capacity,
                prerequisites: row.prerequisites.iter().map(|p| (*p).to_owned()).collect(),
            })
            .await?;
        added += 1;
    }
    println!("Courses: {added} added, {} already present", COURSES.len() - added);

    let mut added = 0;
    for (student_id, course_id) in ENROLLMENTS {
        match registrar.engine().enroll(student_id, course_id).await {
            Ok(_) => added += 1,
            Err(EnrollmentError::AlreadyRegistered { .. }) => {},
            Err(err) => return Err(err.into()),
        }
    }
    println!("Enrollments: {added} added, {} already present", ENROLLMENTS.len() - added);

    info!("Sample data loaded");
    println!("Sample students sign in with password '{SAMPLE_PASSWORD}'.");
    Ok(())
}
