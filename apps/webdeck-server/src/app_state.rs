use std::path::{Path, PathBuf};
use std::sync::Arc;

use webdeck_core::{FileEditor, FolderUploadIngester, ProjectStore, Workspace};

#[derive(Clone)]
pub(crate) struct AppState {
    store: ProjectStore,
    editor: FileEditor,
    ingester: FolderUploadIngester,
    console: Workspace,
    endpoints: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(web_dir: impl Into<PathBuf>, console_dir: impl Into<PathBuf>) -> Self {
        let workspace = Workspace::open(web_dir);
        let store = ProjectStore::new(workspace.clone());
        Self {
            editor: FileEditor::new(workspace),
            ingester: FolderUploadIngester::new(store.clone()),
            store,
            console: Workspace::open(console_dir),
            endpoints: Arc::new(Vec::new()),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = Arc::new(endpoints);
        self
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn editor(&self) -> &FileEditor {
        &self.editor
    }

    pub fn ingester(&self) -> &FolderUploadIngester {
        &self.ingester
    }

    pub fn web(&self) -> &Workspace {
        self.store.workspace()
    }

    pub fn console(&self) -> &Workspace {
        &self.console
    }

    pub fn console_dir(&self) -> &Path {
        self.console.root()
    }

    pub fn endpoints(&self) -> Arc<Vec<String>> {
        self.endpoints.clone()
    }
}
