//! Integration tests for the bulk-import submit/poll cycle.

mod common;

use campaigner::import::{
    CancelFlag, ImportCounts, ImportJobStatus, ImportPoller, PollOutcome, PollPolicy,
};
use campaigner::mapping::auto_map;
use campaigner::media::LocalFile;
use campaigner::recipient::{read_rows_from_str, transform, TransformOptions};
use campaigner::template::extract_schema;

use common::stores::import_job;
use common::{default_contact_fields, FakeRemote, TemplateBuilder};

fn csv_file(dir: &tempfile::TempDir) -> LocalFile {
    let path = dir.path().join("contacts.csv");
    std::fs::write(&path, "phone,name\n+41791234567,Ada\n").unwrap();
    LocalFile::new("contacts.csv", path)
}

#[tokio::test]
async fn test_submit_then_poll_to_success() {
    let remote = FakeRemote::new();
    remote.script_import(vec![
        import_job("import-contacts.csv", ImportJobStatus::Pending, 0, 0),
        import_job("import-contacts.csv", ImportJobStatus::Running, 0, 0),
        import_job("import-contacts.csv", ImportJobStatus::Success, 38, 2),
    ]);

    let dir = tempfile::tempdir().unwrap();
    let poller = ImportPoller::new(&remote, PollPolicy::immediate(10));
    let job_id = poller.submit(&csv_file(&dir)).await.unwrap();
    assert_eq!(job_id, "import-contacts.csv");

    let mut statuses = Vec::new();
    let outcome = poller
        .poll(&job_id, &CancelFlag::new(), |job| statuses.push(job.status))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PollOutcome::Success(ImportCounts {
            total: 40,
            imported: 38,
            failed: 2
        })
    );
    assert_eq!(
        statuses,
        vec![
            ImportJobStatus::Pending,
            ImportJobStatus::Running,
            ImportJobStatus::Success
        ]
    );
    assert_eq!(remote.import_status_calls(), 3);
}

/// The rows read for submission stay in memory; once the poll reports
/// success they feed the transform without a second parse.
#[tokio::test]
async fn test_successful_import_hands_rows_to_transform() {
    let csv = "phone,full_name,name\n\
               +41 79 123 45 67,Ada Lovelace,Ada\n\
               +41791112233,Bob Tables,Bob\n";
    let rows = read_rows_from_str(csv).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.csv");
    std::fs::write(&path, csv).unwrap();

    let remote = FakeRemote::new();
    remote.script_import(vec![import_job(
        "import-contacts.csv",
        ImportJobStatus::Success,
        2,
        0,
    )]);

    let poller = ImportPoller::new(&remote, PollPolicy::immediate(10));
    let job_id = poller
        .submit(&LocalFile::new("contacts.csv", path))
        .await
        .unwrap();
    let outcome = poller
        .poll(&job_id, &CancelFlag::new(), |_| {})
        .await
        .unwrap();

    let counts = match outcome {
        PollOutcome::Success(counts) => counts,
        other => panic!("expected success, got {:?}", other),
    };
    assert_eq!(counts.imported as usize, rows.rows.len());

    let template = TemplateBuilder::new("tpl-1", "welcome")
        .body("Hi {{name}}")
        .build();
    let plan = extract_schema(&template).slot_plan();
    let proposal = auto_map(&rows.headers, &default_contact_fields(), &plan);

    let transformed = transform(
        &rows.rows,
        &proposal.mapping,
        &plan,
        &TransformOptions::default(),
    )
    .unwrap();
    assert_eq!(transformed.recipients.len(), 2);
    assert!(transformed.errors.is_empty());
    assert_eq!(transformed.recipients[0].phone, "+41791234567");
    assert_eq!(
        transformed.recipients[0].template_params.body_params,
        vec!["Ada".to_string()]
    );
}

#[tokio::test]
async fn test_poll_budget_exhaustion_is_resumable() {
    let remote = FakeRemote::new();

    let poller = ImportPoller::new(&remote, PollPolicy::immediate(4));
    let outcome = poller
        .poll("import-1", &CancelFlag::new(), |_| {})
        .await
        .unwrap();
    assert_eq!(outcome, PollOutcome::StillProcessing { attempts: 4 });

    // The job finished in the meantime; a fresh poll picks it up.
    remote.script_import(vec![import_job(
        "import-1",
        ImportJobStatus::Success,
        5,
        0,
    )]);
    let outcome = poller
        .poll("import-1", &CancelFlag::new(), |_| {})
        .await
        .unwrap();
    assert!(matches!(outcome, PollOutcome::Success(_)));
}

#[tokio::test]
async fn test_failed_import_reports_message() {
    let remote = FakeRemote::new();
    let mut failed = import_job("import-1", ImportJobStatus::Failed, 0, 0);
    failed.error = Some("row 7: malformed".to_string());
    remote.script_import(vec![failed]);

    let poller = ImportPoller::new(&remote, PollPolicy::immediate(10));
    let outcome = poller
        .poll("import-1", &CancelFlag::new(), |_| {})
        .await
        .unwrap();
    assert_eq!(outcome, PollOutcome::Failed("row 7: malformed".to_string()));
}

#[tokio::test]
async fn test_cancel_flag_shared_across_clones() {
    let remote = FakeRemote::new();
    let poller = ImportPoller::new(&remote, PollPolicy::immediate(100));

    let cancel = CancelFlag::new();
    let handle = cancel.clone();
    handle.cancel();

    let outcome = poller
        .poll("import-1", &cancel, |_| {})
        .await
        .unwrap();
    assert_eq!(outcome, PollOutcome::Cancelled);
}
