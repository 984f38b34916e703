use boardsync::core::log::render_runs;
use boardsync::db::initialize::init_db;
use boardsync::db::log::{load_log, ttlog};
use boardsync::db::runs::{RunTotals, finish_run, list_runs, load_run, start_run};
use boardsync::db::source::load_master_records;
use boardsync::errors::AppError;
use boardsync::models::domain::materials;
use boardsync::models::{Domain, SourceValue};

mod common;
use common::{create_material_view, insert_material, memory_db};

#[test]
fn test_migrations_apply_once() {
    let conn = memory_db();
    init_db(&conn).unwrap();
    init_db(&conn).unwrap();

    let applied = load_log(&conn)
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == "migration_applied")
        .count();
    assert_eq!(applied, 2);
}

#[test]
fn test_run_lifecycle() {
    let conn = memory_db();
    let id = start_run(&conn, "customers").unwrap();

    let open = load_run(&conn, id).unwrap();
    assert!(open.is_open());
    assert_eq!(open.domain, "customers");

    finish_run(
        &conn,
        id,
        &RunTotals {
            created: 3,
            updated: 2,
            failed: 1,
            remote_complete: false,
        },
    )
    .unwrap();

    let closed = load_run(&conn, id).unwrap();
    assert!(!closed.is_open());
    assert_eq!((closed.created, closed.updated, closed.failed), (3, 2, 1));
    assert!(!closed.remote_complete);
}

#[test]
fn test_run_table_marks_stale_open_runs_as_aborted() {
    let conn = memory_db();
    let aborted = start_run(&conn, "materials").unwrap();
    let done = start_run(&conn, "materials").unwrap();
    finish_run(&conn, done, &RunTotals { remote_complete: true, ..Default::default() }).unwrap();
    start_run(&conn, "customers").unwrap();

    let runs = list_runs(&conn).unwrap();
    assert_eq!(runs[0].id, aborted);

    let out = render_runs(&runs);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].contains("STATE"));
    assert!(lines[2].trim_end().ends_with("aborted"));
    assert!(lines[3].trim_end().ends_with("done"));
    assert!(lines[4].trim_end().ends_with("running"));
}

#[test]
fn test_internal_log_roundtrip() {
    let conn = memory_db();
    ttlog(&conn, "sync", "materials", "run 1: nothing to do").unwrap();

    let last = load_log(&conn).unwrap().pop().unwrap();
    assert_eq!(last.operation, "sync");
    assert_eq!(last.target, "materials");
    assert_eq!(last.message, "run 1: nothing to do");
}

#[test]
fn test_view_rows_become_records() {
    let conn = memory_db();
    create_material_view(&conn);
    insert_material(&conn, "3000001", "Steel coil", "KG");
    insert_material(&conn, " 3000002 ", "Wire", "M");

    let records = load_master_records(&conn, &materials()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].key, "3000002");
    assert_eq!(records[0].get("net_weight"), &SourceValue::Real(125.5));
    assert_eq!(records[1].get("material_name"), &SourceValue::text("Wire"));
    assert_eq!(records[0].get("deletion_flag"), &SourceValue::Null);
}

#[test]
fn test_view_rows_without_key_or_repeated_are_skipped() {
    let conn = memory_db();
    create_material_view(&conn);
    insert_material(&conn, "3000001", "First", "KG");
    insert_material(&conn, "3000001", "Second", "KG");
    insert_material(&conn, "  ", "Blank", "KG");
    conn.execute("INSERT INTO erp_materials (matnr, maktx) VALUES (NULL, 'Null key')", [])
        .unwrap();

    let records = load_master_records(&conn, &materials()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text("material_name").as_deref(), Some("First"));
}

#[test]
fn test_missing_view_and_missing_key_column_are_errors() {
    let conn = memory_db();
    assert!(matches!(
        load_master_records(&conn, &materials()),
        Err(AppError::Db(_))
    ));

    conn.execute_batch("CREATE VIEW material_master_v AS SELECT 'x' AS material_name;")
        .unwrap();
    assert!(matches!(
        load_master_records(&conn, &materials()),
        Err(AppError::Source(_))
    ));
}

#[test]
fn test_upper_case_view_columns_are_read() {
    let conn = memory_db();
    create_material_view(&conn);
    conn.execute_batch(
        r#"
        CREATE VIEW material_master_upper_v AS
            SELECT matnr  AS MATERIAL_CODE,
                   maktx  AS Material_Name,
                   meins  AS BASE_UNIT,
                   ntgew  AS NET_WEIGHT,
                   lvorm  AS DELETION_FLAG
              FROM erp_materials;
        "#,
    )
    .unwrap();
    insert_material(&conn, "3000001", "Steel coil", "KG");

    let mapping = Domain::Materials.mapping("material_master_upper_v");
    let records = load_master_records(&conn, &mapping).unwrap();

    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.key, "3000001");
    assert!(r.fields.contains_key("material_name"));
    assert_eq!(r.get("material_name"), &SourceValue::text("Steel coil"));
    assert_eq!(r.get("BASE_UNIT"), &SourceValue::text("KG"));
    assert_eq!(r.get("net_weight"), &SourceValue::Real(125.5));
    // absent from this view
    assert_eq!(r.get("material_group"), &SourceValue::Null);
}
