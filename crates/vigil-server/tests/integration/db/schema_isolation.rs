/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::TestFixture;
use vigil_server::db::create_shared_connection_pool;

#[test]
fn test_fixtures_do_not_share_data() {
    let first = TestFixture::new();
    let second = TestFixture::new();

    let project = first.create_test_project("Only In First");
    assert!(first.dal.projects().get(project.project.id).unwrap().is_some());
    assert!(second.dal.projects().get(project.project.id).unwrap().is_none());
    assert!(second.dal.projects().list().unwrap().is_empty());
}

#[test]
fn test_migrations_are_idempotent() {
    let fixture = TestFixture::new();
    let url = fixture.settings.database.url.clone();
    let schema = fixture.settings.database.schema.clone();

    let pool = create_shared_connection_pool(&url, 1, schema.as_deref())
        .expect("Failed to create connection pool");
    pool.setup_schema().expect("Schema setup should tolerate an existing schema");
    pool.run_migrations().expect("Re-running migrations should be a no-op");
}

#[test]
fn test_rejects_bad_pool_arguments() {
    assert!(create_shared_connection_pool("mysql://localhost/vigil", 1, None).is_err());
    assert!(create_shared_connection_pool("postgres://localhost/vigil", 1, Some("1bad")).is_err());
    assert!(create_shared_connection_pool("not a url", 1, None).is_err());
}
