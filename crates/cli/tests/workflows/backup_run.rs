//! Full `backup` runs against a stand-in dump program

use crate::common::BackupFixture;
use crate::snapkeep;
use anyhow::Result;
use flate2::read::GzDecoder;
use std::io::Read;

const PRINTF_DUMP: &str = r#"
[dump]
program = "printf"
args = ["cluster dump\n"]
"#;

fn gunzip(bytes: &[u8]) -> Result<String> {
    let mut text = String::new();
    GzDecoder::new(bytes).read_to_string(&mut text)?;
    Ok(text)
}

#[test]
fn test_backup_writes_gzipped_snapshot() -> Result<()> {
    let fx = BackupFixture::new()?;
    let config = fx.write_config(PRINTF_DUMP)?;

    let (dir, now) = (fx.dir_arg(), fx.now_arg());
    let result = snapkeep!(
        fx.root(),
        "backup",
        dir.as_str(),
        "-c",
        config.as_str(),
        "--now",
        now.as_str()
    )
    .assert_success()?;

    let name = fx.name_now();
    assert_eq!(fx.names()?, [name.clone()]);
    assert!(result.contains_stdout("Backing up database to"));
    assert!(result.contains_stdout("Backup successful!"));
    assert!(result.contains_stdout(&format!("Keeping {} (within the last week)", name)));

    let stored = std::fs::read(fx.dir().join(&name))?;
    assert_eq!(gunzip(&stored)?, "cluster dump\n");

    Ok(())
}

#[test]
fn test_backup_creates_missing_directory() -> Result<()> {
    let fx = BackupFixture::new()?;
    let config = fx.write_config(PRINTF_DUMP)?;
    let nested = fx.root().join("var").join("backups");
    let (dir, now) = (nested.display().to_string(), fx.now_arg());

    snapkeep!(
        fx.root(),
        "backup",
        dir.as_str(),
        "-c",
        config.as_str(),
        "--now",
        now.as_str()
    )
    .assert_success()?;

    assert!(nested.join(fx.name_now()).is_file());

    Ok(())
}

#[test]
fn test_single_database_snapshot() -> Result<()> {
    let fx = BackupFixture::new()?;
    let config = fx.write_config(
        r#"
        [dump]
        program = "printf"
        args = ["PGDMP"]
        "#,
    )?;
    fx.add_named("leaderboards.2024-05-01.12-00-00.dump")?;
    fx.add_named("leaderboards.2024-05-06.12-00-00.dump")?;
    let cluster = fx.add_days(40)?;

    let (dir, now) = (fx.dir_arg(), fx.now_arg());
    snapkeep!(
        fx.root(),
        "backup",
        dir.as_str(),
        "--database",
        "leaderboards",
        "-c",
        config.as_str(),
        "--now",
        now.as_str()
    )
    .assert_success()?;

    // Single-database snapshots are stored uncompressed
    let stored = std::fs::read(fx.dir().join("leaderboards.2024-06-15.12-00-00.dump"))?;
    assert_eq!(stored, b"PGDMP");
    assert!(fx.exists("leaderboards.2024-05-01.12-00-00.dump"));
    assert!(!fx.exists("leaderboards.2024-05-06.12-00-00.dump"));
    assert!(fx.exists(&cluster));

    Ok(())
}

#[test]
fn test_failed_dump_still_culls() -> Result<()> {
    let fx = BackupFixture::new()?;
    let config = fx.write_config("[dump]\nprogram = \"false\"\n")?;
    let anchor = fx.add_days(45)?;
    let superseded = fx.add_days(40)?;

    let (dir, now) = (fx.dir_arg(), fx.now_arg());
    let result = snapkeep!(
        fx.root(),
        "backup",
        dir.as_str(),
        "-c",
        config.as_str(),
        "--now",
        now.as_str()
    )
    .assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stdout("Backup failed:"));
    assert!(!fx.exists(&fx.name_now()));
    assert!(fx.exists(&anchor));
    assert!(!fx.exists(&superseded));
    assert!(result.contains_stdout("1 kept, 1 deleted, 0 ignored"));

    Ok(())
}

#[test]
fn test_existing_snapshot_name_is_a_failure() -> Result<()> {
    let fx = BackupFixture::new()?;
    let config = fx.write_config(PRINTF_DUMP)?;
    let name = fx.name_now();
    fx.add_named(&name)?;

    let (dir, now) = (fx.dir_arg(), fx.now_arg());
    let result = snapkeep!(
        fx.root(),
        "backup",
        dir.as_str(),
        "-c",
        config.as_str(),
        "--now",
        now.as_str()
    )
    .assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert_eq!(std::fs::read_to_string(fx.dir().join(&name))?, format!("snapshot {}", name));
    assert_eq!(fx.names()?, [name]);

    Ok(())
}

#[test]
fn test_backup_json_output() -> Result<()> {
    let fx = BackupFixture::new()?;
    let config = fx.write_config(PRINTF_DUMP)?;
    fx.add_days(3)?;

    let (dir, now) = (fx.dir_arg(), fx.now_arg());
    let result = snapkeep!(
        fx.root(),
        "backup",
        dir.as_str(),
        "--json",
        "-c",
        config.as_str(),
        "--now",
        now.as_str()
    )
    .assert_success()?;
    let value = result.json()?;

    assert_eq!(value["dry_run"], false);
    assert_eq!(value["snapshot"]["status"], "written");
    assert_eq!(value["snapshot"]["name"], fx.name_now().as_str());
    assert_eq!(value["snapshot"]["dump_bytes"], 13);
    assert_eq!(value["report"]["lines"].as_array().map(Vec::len), Some(2));

    Ok(())
}

#[test]
fn test_user_and_remote_conflict() -> Result<()> {
    let fx = BackupFixture::new()?;
    let dir = fx.dir_arg();

    let result = snapkeep!(
        fx.root(),
        "backup",
        dir.as_str(),
        "--user",
        "postgres",
        "--remote",
        "db.example.com"
    )
    .assert_failure()?;

    assert_eq!(result.exit_code, 2);
    assert!(fx.names()?.is_empty());

    Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
    let fx = BackupFixture::new()?;
    let config = fx.write_config("keep_days = 30\n")?;
    let dir = fx.dir_arg();

    let result = snapkeep!(fx.root(), "cull", dir.as_str(), "-c", config.as_str()).assert_failure()?;

    assert!(result.contains_stderr("Invalid config file"));

    Ok(())
}
