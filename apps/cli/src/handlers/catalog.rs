use crate::handlers::resolve_course;
use crate::render;
use anyhow::Result;
use registrar::Registrar;

pub(crate) async fn list(registrar: &Registrar) {
    render::course_table(&by_code(registrar.catalog().list().await));
}

pub(crate) async fn available(registrar: &Registrar) {
    render::course_table(&by_code(registrar.catalog().available().await));
}

pub(crate) async fn search(registrar: &Registrar, term: &str) {
    render::course_table(&by_code(registrar.catalog().search(term).await));
}

pub(crate) async fn show(registrar: &Registrar, code: &str) -> Result<()> {
    render::course_detail(&resolve_course(registrar, code).await?);
    Ok(())
}

fn by_code(mut courses: Vec<registrar::domain::Course>) -> Vec<registrar::domain::Course> {
    courses.sort_by(|a, b| a.code.cmp(&b.code));
    courses
}
