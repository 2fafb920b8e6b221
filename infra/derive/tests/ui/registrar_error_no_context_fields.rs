use registrar_derive::registrar_error;

#[registrar_error]
pub enum DemoError {
    #[error("Student not found: {student_id}")]
    StudentNotFound { student_id: String },

    #[error("Nothing to report")]
    Empty {},
}

fn main() {
    let err = DemoError::StudentNotFound { student_id: "S001".to_owned() };
    assert_eq!(err.kind(), "StudentNotFound");
    assert_eq!(DemoError::Empty {}.kind(), "Empty");
}
