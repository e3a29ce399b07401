//! Argument parsing.

use std::path::PathBuf;

use secretaria_core::{CourseId, SecretariatId, TeacherId};

use crate::error::{CliError, CliResult};

pub const USAGE: &str = "\
uso: secretaria [--config ARQUIVO] <comando>

comandos:
  profile                      dados da secretaria
  teachers list                lista professores
  teachers create <form.toml>  cadastra professor
  teachers delete <id>         remove professor
  courses list                 lista cursos
  courses stats                resumo dos cursos
  courses create <form.toml>   cadastra curso
  courses delete <id>          remove curso
  session set <id>             seleciona a secretaria
  session clear                esquece a secretaria selecionada";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Profile,
    TeacherList,
    TeacherCreate { form: PathBuf },
    TeacherDelete { id: TeacherId },
    CourseList,
    CourseStats,
    CourseCreate { form: PathBuf },
    CourseDelete { id: CourseId },
    SessionSet { tenant: SecretariatId },
    SessionClear,
}

/// Parse the command words, skipping `--config <path>` wherever it appears.
pub fn parse_command<I>(args: I) -> CliResult<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut words = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            args.next();
            continue;
        }
        words.push(arg);
    }

    let words: Vec<&str> = words.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        ["profile"] => Command::Profile,
        ["teachers", "list"] => Command::TeacherList,
        ["teachers", "create", form] => Command::TeacherCreate {
            form: PathBuf::from(form),
        },
        ["teachers", "delete", id] => Command::TeacherDelete {
            id: TeacherId::new(*id),
        },
        ["courses", "list"] => Command::CourseList,
        ["courses", "stats"] => Command::CourseStats,
        ["courses", "create", form] => Command::CourseCreate {
            form: PathBuf::from(form),
        },
        ["courses", "delete", id] => Command::CourseDelete {
            id: CourseId::new(*id),
        },
        ["session", "set", id] => Command::SessionSet {
            tenant: SecretariatId::parse(id)
                .map_err(|e| CliError::Usage(format!("id de secretaria inválido: {}", e)))?,
        },
        ["session", "clear"] => Command::SessionClear,
        [] => return Err(CliError::Usage("nenhum comando informado".to_string())),
        other => {
            return Err(CliError::Usage(format!(
                "comando desconhecido: {}",
                other.join(" ")
            )))
        }
    };
    Ok(command)
}
