use std::path::Path;

use tempfile::tempdir;
use webdeck_core::{
    FileEditor, FolderUploadIngester, ProjectStore, UploadEntry, UploadRequest, Workspace,
    WorkspaceError,
};

struct Harness {
    store: ProjectStore,
    editor: FileEditor,
    ingester: FolderUploadIngester,
}

fn harness(root: &Path) -> Harness {
    let ws = Workspace::open(root);
    let store = ProjectStore::new(ws.clone());
    Harness {
        editor: FileEditor::new(ws),
        ingester: FolderUploadIngester::new(store.clone()),
        store,
    }
}

fn sorted_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn create_then_list_on_empty_workspace() {
    let tmp = tempdir().expect("tempdir");
    let h = harness(tmp.path());
    assert!(h.store.list().await.expect("list").is_empty());

    h.store.create("demo").await.expect("create");
    assert_eq!(
        sorted_entries(&tmp.path().join("demo")),
        vec!["index.html", "script.js", "style.css"]
    );
    assert_eq!(h.store.list().await.expect("list"), vec!["demo".to_string()]);
}

#[tokio::test]
async fn delete_twice_is_success_then_not_found() {
    let tmp = tempdir().expect("tempdir");
    let h = harness(tmp.path());
    h.store.create("demo").await.expect("create");
    h.store.delete("demo").await.expect("delete");
    assert!(matches!(
        h.store.delete("demo").await,
        Err(WorkspaceError::NotFound(_))
    ));
    assert!(h.store.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn editor_round_trip_and_rejections() {
    let tmp = tempdir().expect("tempdir");
    let h = harness(tmp.path());
    h.store.create("demo").await.expect("create");

    for (file, content) in [
        ("index.html", "<main>new</main>"),
        ("style.css", "p { color: red; }\r\n"),
        ("script.js", "let s = `multi\nline`;"),
    ] {
        h.editor.write("demo", file, content).await.expect("write");
        assert_eq!(h.editor.read("demo", file).await.expect("read"), content);
    }

    let err = h
        .editor
        .write("demo", "../../evil.html", "x")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidPath(_)));
    assert_eq!(sorted_entries(tmp.path()), vec!["demo"]);

    assert!(matches!(
        h.editor.read("demo", "data.bin").await,
        Err(WorkspaceError::DisallowedType(_))
    ));
}

#[tokio::test]
async fn upload_skips_disallowed_types_and_aborts_on_traversal() {
    let tmp = tempdir().expect("tempdir");
    let h = harness(tmp.path());
    let err = h
        .ingester
        .ingest(UploadRequest {
            project_name: "site".into(),
            root_folder: "site".into(),
            overwrite: false,
            entries: vec![
                UploadEntry::new("site/index.html", "<h1>site</h1>"),
                UploadEntry::new("site/setup.exe", "MZ"),
                UploadEntry::new("site/css/../../../escape.css", "x"),
                UploadEntry::new("site/after.js", "never written"),
            ],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::PathTraversal(_)));

    let dest = tmp.path().join("site");
    assert!(dest.join("index.html").is_file());
    assert!(!dest.join("setup.exe").exists());
    assert!(!dest.join("after.js").exists());
    assert!(!tmp.path().join("escape.css").exists());
    assert_eq!(h.store.list().await.expect("list"), vec!["site".to_string()]);
}

#[tokio::test]
async fn upload_overwrite_flag_controls_replacement() {
    let tmp = tempdir().expect("tempdir");
    let h = harness(tmp.path());
    h.store.create("demo").await.expect("create");
    std::fs::write(tmp.path().join("demo/keep.txt"), "original").expect("write");

    let request = |overwrite| UploadRequest {
        project_name: "demo".into(),
        root_folder: "upload".into(),
        overwrite,
        entries: vec![
            UploadEntry::new("upload/index.html", "<h1>replaced</h1>"),
            UploadEntry::new("upload/img/a.png", vec![1u8, 2, 3]),
        ],
    };

    let err = h.ingester.ingest(request(false)).await.unwrap_err();
    assert!(matches!(err, WorkspaceError::AlreadyExists(_)));
    assert_eq!(
        sorted_entries(&tmp.path().join("demo")),
        vec!["index.html", "keep.txt", "script.js", "style.css"]
    );

    let summary = h.ingester.ingest(request(true)).await.expect("overwrite");
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.skipped, 0);
    assert!(summary.has_index);
    assert_eq!(
        sorted_entries(&tmp.path().join("demo")),
        vec!["img", "index.html"]
    );
    assert_eq!(
        h.editor.read("demo", "index.html").await.expect("read"),
        "<h1>replaced</h1>"
    );
}

#[tokio::test]
async fn uploaded_project_without_index_is_not_listed() {
    let tmp = tempdir().expect("tempdir");
    let h = harness(tmp.path());
    let summary = h
        .ingester
        .ingest(UploadRequest {
            project_name: "assets".into(),
            root_folder: "assets".into(),
            overwrite: false,
            entries: vec![UploadEntry::new("assets/app.js", "1")],
        })
        .await
        .expect("ingest");
    assert!(!summary.has_index);
    assert!(h.store.list().await.expect("list").is_empty());
    assert_eq!(
        h.editor.list_editable("assets").await.expect("editable"),
        vec!["app.js"]
    );
}
