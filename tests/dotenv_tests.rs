use std::env;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

fn write_env_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("env file is writable");
    path
}

#[test]
fn test_parse_files_merges_in_argument_order() {
    let dir = TempDir::new().expect("temp dir");
    let first = write_env_file(&dir, ".env.local", "SHARED=local\nONLY_LOCAL=1\n");
    let second = write_env_file(&dir, ".env", "SHARED=base\nONLY_BASE=2\n");

    let vars = crosstie::dotenv::parse_files(&[first, second], false).expect("files parse");

    // Later files overwrite earlier ones.
    assert_eq!(vars["SHARED"], "base");
    assert_eq!(vars["ONLY_LOCAL"], "1");
    assert_eq!(vars["ONLY_BASE"], "2");
}

#[test]
fn test_parse_files_reports_missing_files() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join(".env.nonexistent");

    let err = crosstie::dotenv::parse_files(&[&missing], false).unwrap_err();
    assert!(err.to_string().contains(".env.nonexistent"));

    let vars = crosstie::dotenv::parse_files(&[&missing], true).expect("missing file is skipped");
    assert!(vars.is_empty());
}

#[test]
fn test_load_does_not_overwrite_process_env_by_default() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_env_file(&dir, ".env", "CROSSTIE_TEST_KEEP=from-file\n");

    env::set_var("CROSSTIE_TEST_KEEP", "from-process");
    crosstie::dotenv::load(&[&path], false).expect("env file loads");

    assert_eq!(env::var("CROSSTIE_TEST_KEEP").as_deref(), Ok("from-process"));
}

#[test]
fn test_load_overwrites_when_asked() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_env_file(&dir, ".env", "CROSSTIE_TEST_CLOBBER=from-file\n");

    env::set_var("CROSSTIE_TEST_CLOBBER", "from-process");
    crosstie::dotenv::load(&[&path], true).expect("env file loads");

    assert_eq!(env::var("CROSSTIE_TEST_CLOBBER").as_deref(), Ok("from-file"));
}

#[test]
fn test_load_sets_fresh_variables() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_env_file(&dir, ".env", "CROSSTIE_TEST_FRESH=hello\n");

    crosstie::dotenv::load(&[&path], false).expect("env file loads");

    assert_eq!(env::var("CROSSTIE_TEST_FRESH").as_deref(), Ok("hello"));
}

#[test]
fn test_full_file_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_env_file(
        &dir,
        ".env",
        concat!(
            "# database settings\n",
            "DB_HOST=localhost\n",
            "DB_PORT=5432\n",
            "DB_URL=\"postgres://$DB_HOST:${DB_PORT}/app\" # composed\n",
            "MOTD='hello $DB_HOST'\n",
            "BANNER=\"line one\\nline two\"\n",
            "WHOAMI=$(echo runtime)\n",
            "export DB_HOST DB_PORT\n",
        ),
    );

    let vars = crosstie::dotenv::parse_files(&[&path], false).expect("file parses");

    assert_eq!(vars["DB_HOST"], "localhost");
    assert_eq!(vars["DB_PORT"], "5432");
    assert_eq!(vars["DB_URL"], "postgres://localhost:5432/app");
    assert_eq!(vars["MOTD"], "hello $DB_HOST");
    assert_eq!(vars["BANNER"], "line one\nline two");
    assert_eq!(vars["WHOAMI"], "runtime");
}

#[test]
fn test_unset_export_fails_the_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_env_file(&dir, ".env", "FOO=bar\nexport FOO NEVER_SET\n");

    let err = crosstie::dotenv::parse_files(&[&path], false).unwrap_err();
    assert!(err.to_string().contains(".env"));
    assert!(format!("{:#}", err).contains("unset variable"));
}
