use rusqlite::Connection;
use unirecords_core::db::migrations::latest_version;
use unirecords_core::db::{open_db, open_db_in_memory, ConnectionOptions, DbError};

const TABLES: &[&str] = &[
    "department",
    "programme",
    "lecturer",
    "student",
    "non_academic_staff",
    "course",
    "research_project",
    "student_grade",
    "publication",
    "course_material",
    "project_funding",
    "student_course",
    "lecturer_course",
    "course_prerequisite",
    "programme_course",
    "research_project_member",
    "disciplinary_record",
    "lecturer_qualification",
    "lecturer_expertise",
    "lecturer_research_interest",
    "department_research_area",
    "project_outcome",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.db");

    let conn_first = open_db(&path, &ConnectionOptions::default()).unwrap();
    conn_first
        .execute("INSERT INTO department (name) VALUES ('Chemistry')", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path, &ConnectionOptions::default()).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM department", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path, &ConnectionOptions::default()).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn foreign_keys_are_enforced_by_default() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO publication (lecturer_id, title) VALUES (42, 'Orphan')",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn deleting_a_department_nulls_member_references() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO department (dept_id, name) VALUES (1, 'Biology');
         INSERT INTO lecturer (lecturer_id, name, dept_id) VALUES (1, 'Dr Lee', 1);
         DELETE FROM department WHERE dept_id = 1;",
    )
    .unwrap();

    let dept_id: Option<i64> = conn
        .query_row("SELECT dept_id FROM lecturer WHERE lecturer_id = 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(dept_id, None);
}

#[test]
fn version_one_database_is_upgraded_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
        .unwrap();
    conn.execute_batch(
        "PRAGMA user_version = 1;
         INSERT INTO student (student_id, name) VALUES (1, 'Ada');",
    )
    .unwrap();
    drop(conn);

    let upgraded = open_db(&path, &ConnectionOptions::default()).unwrap();
    assert_eq!(schema_version(&upgraded), latest_version());
    assert_table_exists(&upgraded, "disciplinary_record");
    upgraded
        .execute(
            "INSERT INTO disciplinary_record (student_id, description) VALUES (1, 'Late library return')",
            [],
        )
        .unwrap();
}

#[test]
fn deleting_a_student_removes_their_disciplinary_records() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO student (student_id, name) VALUES (1, 'Ada');
         INSERT INTO disciplinary_record (student_id, description) VALUES (1, 'Noise');
         DELETE FROM student WHERE student_id = 1;",
    )
    .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM disciplinary_record", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
