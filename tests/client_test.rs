//! End-to-end client behavior over both backends.

use trackdb::{build_backend, Error, Query, TrackClient, TrialStatus};

#[test]
fn test_project_group_trial_association() {
    let mut client = TrackClient::new("memory://e2e-association").unwrap();

    client.set_project("convnet", "vision baseline").unwrap();
    client.set_group("baseline", "control runs").unwrap();
    client.new_trial().unwrap();

    client.log_arguments([("lr", 0.01)], false).unwrap();
    client.log_metrics(Some(0), [("loss", 2.3)]).unwrap();
    client.save().unwrap();

    // the saved trial uid may differ from the pre-insert uid if parameters
    // were logged before the flush
    let saved_uid = client.trial_uid().unwrap().to_string();
    assert!(!saved_uid.is_empty());

    let backend = build_backend("memory://e2e-association").unwrap();
    let projects = backend.fetch_projects(&Query::new()).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].trials(), [saved_uid.clone()]);

    let groups = backend.fetch_groups(&Query::new()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].trials(), [saved_uid.clone()]);

    let trial = backend.get_trial(&saved_uid).unwrap().unwrap();
    assert_eq!(trial.project(), "convnet");
    assert_eq!(trial.group(), Some(groups[0].uid()));
    assert_eq!(trial.metrics().len(), 1);
}

#[test]
fn test_log_metrics_before_new_trial_fails() {
    let mut client = TrackClient::new("memory://e2e-state-error").unwrap();
    client.set_project("convnet", "").unwrap();

    let outcome = client.log_metrics(Some(0), [("loss", 0.5)]);
    assert!(matches!(outcome, Err(Error::InvalidState(_))));
}

#[test]
fn test_log_arguments_before_new_trial_fails() {
    let mut client = TrackClient::new("memory://e2e-arguments-state-error").unwrap();
    client.set_project("convnet", "").unwrap();

    let outcome = client.log_arguments([("lr", 0.01)], false);
    assert!(matches!(outcome, Err(Error::InvalidState(_))));
}

#[test]
fn test_log_arguments_show_echoes_mapping() {
    let mut client = TrackClient::new("memory://e2e-arguments").unwrap();
    client.set_project("convnet", "").unwrap();
    client.new_trial().unwrap();

    let recorded = client.log_arguments([("lr", 0.01)], true).unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded["lr"], serde_json::json!(0.01));
}

#[test]
fn test_same_step_appends_two_records() {
    let mut client = TrackClient::new("memory://e2e-append-only").unwrap();
    client.set_project("convnet", "").unwrap();
    client.new_trial().unwrap();

    client.log_metrics(Some(5), [("loss", 0.5)]).unwrap();
    client.log_metrics(Some(5), [("loss", 0.45)]).unwrap();

    let report = client.report().unwrap();
    let records = report.trial().metrics_for("loss");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.step() == Some(5)));
}

#[test]
fn test_save_and_reopen_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("file:{}", dir.path().join("runs.json").display());

    let saved_uid = {
        let mut client = TrackClient::new(&uri).unwrap();
        client.set_project("convnet", "vision baseline").unwrap();
        client.set_group("baseline", "control runs").unwrap();
        client.new_trial().unwrap();
        client.log_arguments([("lr", 0.01)], false).unwrap();
        for epoch in 0..3u32 {
            let loss = 1.0 / (f64::from(epoch) + 1.0);
            client.log_metrics(Some(u64::from(epoch)), [("loss", loss)]).unwrap();
        }
        client.finish(TrialStatus::Success).unwrap();
        client.save().unwrap();
        client.trial_uid().unwrap().to_string()
    };

    let backend = build_backend(&uri).unwrap();
    let projects = backend.fetch_projects(&Query::new()).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name(), "convnet");
    assert_eq!(projects[0].description(), "vision baseline");

    let groups = backend.fetch_groups(&Query::new()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name(), "baseline");

    let trial = backend.get_trial(&saved_uid).unwrap().unwrap();
    assert_eq!(trial.status(), TrialStatus::Success);
    assert_eq!(trial.parameters()["lr"], serde_json::json!(0.01));

    let loss = trial.metrics_for("loss");
    assert_eq!(loss.len(), 3);
    assert_eq!(loss[0].step(), Some(0));
    assert_eq!(loss[2].step(), Some(2));
}

#[test]
fn test_rerun_same_configuration_bumps_revision() {
    let mut client = TrackClient::new("memory://e2e-revision").unwrap();
    client.set_project("convnet", "").unwrap();

    client.new_trial().unwrap();
    client.save().unwrap();
    let first = client.trial_uid().unwrap().to_string();

    client.new_trial().unwrap();
    client.save().unwrap();
    let second = client.trial_uid().unwrap().to_string();

    assert_ne!(first, second, "identical configurations must not overwrite");

    let backend = build_backend("memory://e2e-revision").unwrap();
    assert_eq!(backend.fetch_trials(&Query::new()).unwrap().len(), 2);
}

#[test]
fn test_distinct_arguments_distinct_uids() {
    let mut client = TrackClient::new("memory://e2e-distinct-args").unwrap();
    client.set_project("convnet", "").unwrap();
    client.set_group("sweep", "").unwrap();

    client.new_trial().unwrap();
    client.log_arguments([("a", 1)], false).unwrap();
    client.save().unwrap();
    let uid1 = client.trial_uid().unwrap().to_string();

    client.new_trial().unwrap();
    client.log_arguments([("a", 2)], false).unwrap();
    client.save().unwrap();
    let uid2 = client.trial_uid().unwrap().to_string();

    assert_ne!(
        uid1, uid2,
        "trials with different parameters must have different uids"
    );
}

#[test]
fn test_timed_block_records_runtime() {
    let mut client = TrackClient::new("memory://e2e-chrono").unwrap();
    client.set_project("convnet", "").unwrap();
    client.new_trial().unwrap();

    let total = client
        .time("train", |client| {
            let mut total = 0.0;
            for step in 0..10u32 {
                let loss = 1.0 / (f64::from(step) + 1.0);
                total += loss;
                client.log_metrics(Some(u64::from(step)), [("loss", loss)])?;
            }
            Ok(total)
        })
        .unwrap();
    assert!(total > 0.0);

    let report = client.report().unwrap();
    let chrono = &report.trial().chronos()["train"];
    assert_eq!(chrono.len(), 1);
    assert!(chrono.mean().unwrap() >= 0.0);
}
