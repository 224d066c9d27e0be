use unirecords_core::db::open_db_in_memory;
use unirecords_core::{Fields, NonAcademicStaff, RepositoryFacade};

#[test]
fn stored_records_serialize_with_column_names() {
    let conn = open_db_in_memory().unwrap();
    let facade = RepositoryFacade::new(&conn).unwrap();
    let staff = facade
        .staff()
        .create(
            &Fields::new()
                .set("name", "Morgan")
                .set("job_title", "Librarian")
                .set("salary", 28_750.25),
        )
        .unwrap();

    let value = serde_json::to_value(&staff).unwrap();
    assert_eq!(value["staff_id"], staff.staff_id);
    assert_eq!(value["name"], "Morgan");
    assert_eq!(value["salary"], 28_750.25);
    assert!(value["dept_id"].is_null());

    let decoded: NonAcademicStaff = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, staff);
}
