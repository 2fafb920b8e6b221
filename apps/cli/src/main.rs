#![allow(clippy::print_stdout, clippy::print_stderr)]

mod args;
mod handlers;
mod render;

use crate::args::{Cli, Command, CourseAction, StudentAction};
use crate::handlers::{catalog, enrollment, seed, students};
use anyhow::{Context, Result};
use clap::Parser;
use registrar::Registrar;
use registrar::domain::config::RegistrarConfig;
use registrar::kernel::config::load_config;
use registrar_logger::Logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg: RegistrarConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    let registrar = Registrar::builder().config(cfg).build().await?;

    match cli.command {
        Command::Seed => seed::load_sample_data(&registrar).await?,
        Command::Student { action } => match action {
            StudentAction::Add(args) => students::add(&registrar, args).await?,
            StudentAction::Show { student } => students::show(&registrar, &student).await?,
        },
        Command::Login { username } => students::login(&registrar, &username).await?,
        Command::Courses { action } => match action {
            CourseAction::List => catalog::list(&registrar).await,
            CourseAction::Available => catalog::available(&registrar).await,
            CourseAction::Search { term } => catalog::search(&registrar, &term).await,
            CourseAction::Show { code } => catalog::show(&registrar, &code).await?,
        },
        Command::Enroll { student, course_code } => enrollment::enroll(&registrar, &student, &course_code).await?,
        Command::Drop { student, course_code } => enrollment::drop(&registrar, &student, &course_code).await?,
        Command::MyCourses { student } => enrollment::my_courses(&registrar, &student).await?,
        Command::Grade { registration_id, grade } => enrollment::grade(&registrar, &registration_id, &grade).await?,
        Command::Roster { course_code } => enrollment::roster(&registrar, &course_code).await?,
        Command::Reconcile => enrollment::reconcile(&registrar).await?,
    }

    Ok(())
}
