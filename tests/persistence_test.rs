//! Backend selection and durability behavior.

use trackdb::{build_backend, Error, Project, Query, TrackClient, Trial, TrialGroup};

#[test]
fn test_unknown_scheme_fails_at_construction() {
    assert!(matches!(
        TrackClient::new("cockroach://localhost:26257/track"),
        Err(Error::UnsupportedScheme(_))
    ));
}

#[test]
fn test_malformed_uri_fails_at_construction() {
    assert!(matches!(
        TrackClient::new("runs.json"),
        Err(Error::InvalidUri(_))
    ));
}

#[test]
fn test_memory_backends_share_by_name() {
    let mut writer = build_backend("memory://persistence-shared").unwrap();
    writer
        .new_project(Project::new("convnet", "shared"))
        .unwrap();

    let reader = build_backend("memory://persistence-shared").unwrap();
    let projects = reader.fetch_projects(&Query::new()).unwrap();
    assert_eq!(projects.len(), 1);
}

#[test]
fn test_file_backend_is_durable_only_after_commit() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("file:{}", dir.path().join("runs.json").display());

    let mut backend = build_backend(&uri).unwrap();
    backend.new_project(Project::new("convnet", "")).unwrap();

    // no commit yet: a fresh open sees nothing
    let fresh = build_backend(&uri).unwrap();
    assert!(fresh.fetch_projects(&Query::new()).unwrap().is_empty());

    backend.commit().unwrap();
    let fresh = build_backend(&uri).unwrap();
    assert_eq!(fresh.fetch_projects(&Query::new()).unwrap().len(), 1);
}

#[test]
fn test_file_backend_commit_overwrites_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs.json");
    let uri = format!("file:{}", path.display());

    let mut backend = build_backend(&uri).unwrap();
    backend.new_project(Project::new("first", "")).unwrap();
    backend.commit().unwrap();

    backend.new_project(Project::new("second", "")).unwrap();
    backend.commit().unwrap();

    let fresh = build_backend(&uri).unwrap();
    assert_eq!(fresh.fetch_projects(&Query::new()).unwrap().len(), 2);
    assert!(!dir.path().join("runs.json.tmp").exists());
}

#[test]
fn test_group_without_project_is_rejected() {
    let mut backend = build_backend("memory://persistence-orphan-group").unwrap();
    let outcome = backend.new_group(TrialGroup::new("baseline", "", "missing"));
    assert!(matches!(outcome, Err(Error::MissingParent(_))));
}

#[test]
fn test_trial_without_project_is_rejected() {
    let mut backend = build_backend("memory://persistence-orphan-trial").unwrap();
    let outcome = backend.new_trial(Trial::new("missing", None));
    assert!(matches!(outcome, Err(Error::MissingParent(_))));
}

#[test]
fn test_redeclared_group_keeps_stored_record() {
    let uri = "memory://persistence-redeclare-group";
    let mut client = TrackClient::new(uri).unwrap();
    client.set_project("convnet", "").unwrap();
    client.set_group("baseline", "original description").unwrap();
    client.new_trial().unwrap();
    client.save().unwrap();
    let trial_uid = client.trial_uid().unwrap().to_string();

    let mut backend = build_backend(uri).unwrap();
    let again = backend
        .new_group(TrialGroup::new("baseline", "new description", "convnet"))
        .unwrap();

    assert_eq!(again.description(), "original description");
    assert_eq!(again.trials(), [trial_uid]);
    assert_eq!(backend.fetch_groups(&Query::new()).unwrap().len(), 1);
}

#[test]
fn test_redeclared_project_keeps_stored_record() {
    let mut backend = build_backend("memory://persistence-redeclare").unwrap();
    backend
        .new_project(Project::new("convnet", "original description"))
        .unwrap();
    let second = backend
        .new_project(Project::new("convnet", "new description"))
        .unwrap();

    assert_eq!(second.description(), "original description");
    assert_eq!(backend.fetch_projects(&Query::new()).unwrap().len(), 1);
}
