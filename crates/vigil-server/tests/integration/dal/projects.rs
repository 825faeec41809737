/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::TestFixture;
use vigil_server::dal::projects::KeyAccess;
use vigil_server::utils;
use vigil_server::utils::keys::hash_key;

#[test]
fn test_lookup_by_key_hash() {
    let fixture = TestFixture::new();
    let project = fixture.create_test_project("Lookup");

    let (found, access) = fixture
        .dal
        .projects()
        .get_by_key_hash(&hash_key(&project.api_key))
        .expect("Failed to look up key")
        .expect("Project not found");
    assert_eq!(found.id, project.project.id);
    assert_eq!(access, KeyAccess::ReadWrite);

    let (_, access) = fixture
        .dal
        .projects()
        .get_by_key_hash(&hash_key(&project.read_key))
        .unwrap()
        .unwrap();
    assert_eq!(access, KeyAccess::ReadOnly);

    assert!(fixture
        .dal
        .projects()
        .get_by_key_hash(&hash_key("not a key"))
        .unwrap()
        .is_none());
}

#[test]
fn test_lookup_by_ping_key() {
    let fixture = TestFixture::new();
    let project = fixture.create_test_project("Ping Key");

    let found = fixture
        .dal
        .projects()
        .get_by_ping_key(&project.ping_key)
        .unwrap()
        .expect("Project not found");
    assert_eq!(found.id, project.project.id);
    assert!(fixture.dal.projects().get_by_ping_key("unknown").unwrap().is_none());
}

#[test]
fn test_rotate_keys() {
    let fixture = TestFixture::new();
    let project = fixture.create_test_project("Rotate");

    let (rotated, keys) = utils::rotate_project_keys(&fixture.dal, project.project.id)
        .expect("Failed to rotate keys");
    assert_eq!(rotated.id, project.project.id);
    assert_ne!(keys.api_key, project.api_key);
    assert_eq!(rotated.api_key_hash, hash_key(&keys.api_key));

    let projects = fixture.dal.projects();
    assert!(projects.get_by_key_hash(&hash_key(&project.api_key)).unwrap().is_none());
    assert!(projects.get_by_key_hash(&hash_key(&keys.api_key)).unwrap().is_some());
    assert!(projects.get_by_ping_key(&project.ping_key).unwrap().is_none());

    assert!(utils::rotate_project_keys(&fixture.dal, uuid::Uuid::new_v4()).is_err());
}

#[test]
fn test_checks_available() {
    let fixture = TestFixture::new();
    let project = fixture.create_test_project_with_limit("Capacity", 3);
    let projects = fixture.dal.projects();

    assert_eq!(projects.num_checks_available(&project.project).unwrap(), 3);
    let first = fixture.create_test_check(project.project.id, "one", "");
    fixture.create_test_check(project.project.id, "two", "");
    assert_eq!(projects.num_checks_available(&project.project).unwrap(), 1);

    fixture.dal.checks().archive(first.id, "api").unwrap();
    assert_eq!(projects.num_checks_available(&project.project).unwrap(), 2);
}

#[test]
fn test_delete_project_cascades() {
    let fixture = TestFixture::new();
    let project = fixture.create_test_project("Doomed");
    let check = fixture.create_test_check(project.project.id, "orphan", "");

    assert_eq!(fixture.dal.projects().delete(project.project.id).unwrap(), 1);
    assert!(fixture.dal.projects().get(project.project.id).unwrap().is_none());
    assert!(fixture.dal.checks().get(check.id).unwrap().is_none());
    assert!(fixture
        .dal
        .activity_logs()
        .list_for_project(project.project.id, 10)
        .unwrap()
        .is_empty());
}

#[test]
fn test_list_projects_oldest_first() {
    let fixture = TestFixture::new();
    let first = fixture.create_test_project("First");
    let second = fixture.create_test_project("Second");

    let ids: Vec<_> = fixture
        .dal
        .projects()
        .list()
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![first.project.id, second.project.id]);
}
