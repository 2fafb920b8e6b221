use crate::args::NewStudentArgs;
use crate::handlers::{read_password, resolve_student};
use crate::render;
use anyhow::{Result, bail};
use registrar::Registrar;
use registrar::features::identity::NewStudent;

pub(crate) async fn add(registrar: &Registrar, args: NewStudentArgs) -> Result<()> {
    let password = read_password().await?;
    let student = registrar
        .accounts()
        .create_student(NewStudent {
            id: None,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            username: args.username,
            password,
            major: args.major,
            year: args.year,
            phone: args.phone,
            address: args.address,
        })
        .await?;

    println!("Created student {} ({}) with id {}", student.name(), student.username, student.id);
    Ok(())
}

pub(crate) async fn login(registrar: &Registrar, username: &str) -> Result<()> {
    let password = read_password().await?;
    if !registrar.accounts().authenticate(username, &password).await? {
        bail!("Invalid username or password");
    }
    if let Some(student) = registrar.accounts().find_by_username(username).await? {
        println!("Welcome, {}! ({}, year {})", student.name(), student.major, student.year);
    }
    Ok(())
}

pub(crate) async fn show(registrar: &Registrar, key: &str) -> Result<()> {
    let student = resolve_student(registrar, key).await?;
    render::student_detail(&student);
    Ok(())
}
