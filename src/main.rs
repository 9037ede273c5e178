// ==========================================
// 旅游后台批量导入 - 命令行入口
// ==========================================
// Usage:
//   travel-import schemas
//   travel-import preview <entity_type> <file> [--db <path>] [--user <email>]
//   travel-import commit  <entity_type> <file> [--db <path>] [--user <email>]
//
// 输出 JSON；出错时输出 ErrorResponse JSON 并以非零码退出
// ==========================================

use anyhow::{bail, Context};
use rusqlite::Connection;
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use travel_import::api::{map_api_error, ApiError, ApiResult, EntitySchemaSummary};
use travel_import::db::{
    get_default_db_path, init_schema, open_sqlite_connection, read_schema_version,
};
use travel_import::importer::{all_schemas, ImportError};
use travel_import::{
    logging, BulkInsertRepositoryImpl, ConfigManager, ImportApi, StaticAuthProvider, User,
};

/// 当前用户环境变量（未传 --user 时读取）
const USER_ENV: &str = "TRAVEL_IMPORT_USER";

/// 日志格式环境变量，值为 json 时输出 JSON 行日志
const LOG_FORMAT_ENV: &str = "TRAVEL_IMPORT_LOG";

const USAGE: &str = "\
Usage:
  travel-import schemas
  travel-import preview <entity_type> <file> [--db <path>] [--user <email>]
  travel-import commit  <entity_type> <file> [--db <path>] [--user <email>]";

#[derive(Debug, PartialEq)]
enum Command {
    Schemas,
    Preview(FileArgs),
    Commit(FileArgs),
}

#[derive(Debug, PartialEq)]
struct FileArgs {
    entity_type: String,
    file: String,
    db: Option<String>,
    user: Option<String>,
}

fn parse_args(args: Vec<String>) -> anyhow::Result<Command> {
    let mut iter = args.into_iter();
    let command = iter.next().context("缺少子命令")?;

    match command.as_str() {
        "schemas" => Ok(Command::Schemas),
        "preview" | "commit" => {
            let mut positional = Vec::new();
            let mut db = None;
            let mut user = None;

            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--db" => db = Some(iter.next().context("--db 缺少参数")?),
                    "--user" => user = Some(iter.next().context("--user 缺少参数")?),
                    flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
                    _ => positional.push(arg),
                }
            }

            if positional.len() != 2 {
                bail!("{} 需要 <entity_type> <file>", command);
            }
            let file = positional.pop().unwrap_or_default();
            let entity_type = positional.pop().unwrap_or_default();

            let file_args = FileArgs {
                entity_type,
                file,
                db,
                user,
            };
            Ok(if command == "preview" {
                Command::Preview(file_args)
            } else {
                Command::Commit(file_args)
            })
        }
        other => bail!("未知子命令: {}", other),
    }
}

/// 组装 ImportApi（仓储与配置共享同一连接）
fn build_api(args: &FileArgs) -> ApiResult<ImportApi> {
    let db_path = args.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let conn: Connection = open_sqlite_connection(&db_path)
        .map_err(|e| ApiError::InternalError(format!("数据库打开失败: {}", e)))?;
    init_schema(&conn).map_err(|e| ApiError::InternalError(format!("数据库初始化失败: {}", e)))?;
    match read_schema_version(&conn) {
        Ok(version) => tracing::debug!(schema_version = ?version, "数据库结构就绪"),
        Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
    }
    let conn = Arc::new(Mutex::new(conn));

    let repo = BulkInsertRepositoryImpl::from_connection(conn.clone())?;
    let config = ConfigManager::from_connection(conn)?;

    let user = args
        .user
        .clone()
        .or_else(|| std::env::var(USER_ENV).ok())
        .filter(|u| !u.trim().is_empty());
    let auth = match user {
        Some(email) => StaticAuthProvider::authenticated(User::new(email.clone()).with_email(email)),
        None => StaticAuthProvider::anonymous(),
    };

    Ok(ImportApi::new(Arc::new(repo), Arc::new(auth), Arc::new(config)))
}

fn read_upload(file: &str) -> ApiResult<(String, Vec<u8>)> {
    let file_name = Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file)
        .to_string();
    let bytes = std::fs::read(file).map_err(ImportError::from)?;
    Ok((file_name, bytes))
}

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::InternalError(e.to_string()))
}

async fn run(command: Command) -> ApiResult<String> {
    match command {
        Command::Schemas => {
            let schemas: Vec<EntitySchemaSummary> =
                all_schemas().iter().map(EntitySchemaSummary::from).collect();
            to_json(&schemas)
        }
        Command::Preview(args) => {
            let api = build_api(&args)?;
            let (file_name, bytes) = read_upload(&args.file)?;
            let resp = api.preview_file(&args.entity_type, &file_name, &bytes).await?;
            to_json(&resp)
        }
        Command::Commit(args) => {
            let api = build_api(&args)?;
            let (file_name, bytes) = read_upload(&args.file)?;
            let resp = api.commit_file(&args.entity_type, &file_name, &bytes).await?;
            to_json(&resp)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if std::env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::debug!("{} v{}", travel_import::APP_NAME, travel_import::VERSION);

    let command = match parse_args(std::env::args().skip(1).collect()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(command).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.code(), "{}", e);
            println!("{}", map_api_error(&e));
            ExitCode::FAILURE
        }
    }
}
