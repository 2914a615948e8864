use std::mem;

use axum::{
    handler::Handler,
    routing::{delete, get, post},
    Router,
};

use crate::{api, AppState};

pub(crate) struct RouterBuilder {
    router: Router<AppState>,
    endpoints: Vec<String>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            endpoints: Vec::new(),
        }
    }

    fn record(&mut self, method: &str, path: &'static str) {
        self.endpoints.push(format!("{} {}", method, path));
    }

    pub fn route_get<H, T>(&mut self, path: &'static str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState> + Clone + 'static,
        T: Send + 'static,
    {
        self.record("GET", path);
        let router = mem::take(&mut self.router);
        self.router = router.route(path, get(handler));
        self
    }

    pub fn route_post<H, T>(&mut self, path: &'static str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState> + Clone + 'static,
        T: Send + 'static,
    {
        self.record("POST", path);
        let router = mem::take(&mut self.router);
        self.router = router.route(path, post(handler));
        self
    }

    pub fn route_delete<H, T>(&mut self, path: &'static str, handler: H) -> &mut Self
    where
        H: Handler<T, AppState> + Clone + 'static,
        T: Send + 'static,
    {
        self.record("DELETE", path);
        let router = mem::take(&mut self.router);
        self.router = router.route(path, delete(handler));
        self
    }

    pub fn build(self) -> (Router<AppState>, Vec<String>) {
        (self.router, self.endpoints)
    }
}

pub(crate) mod paths {
    pub const HEALTHZ: &str = "/healthz";
    pub const ABOUT: &str = "/about";
    pub const CONSOLE_INDEX: &str = "/";
    pub const CONSOLE_ASSET: &str = "/hack/{*path}";
    pub const HACK_TRIGGER: &str = "/hack-trigger";
    pub const PROJECTS: &str = "/projects";
    pub const PROJECT: &str = "/projects/{name}";
    pub const EDIT_LIST: &str = "/edit/list";
    pub const EDIT_FILE: &str = "/edit/file";
    pub const UPLOAD_PROJECT: &str = "/upload/project";
    pub const WEB: &str = "/web";
    pub const WEB_SLASH: &str = "/web/";
    pub const WEB_PATH: &str = "/web/{*path}";
}

pub(crate) fn build_router() -> (Router<AppState>, Vec<String>) {
    let mut builder = RouterBuilder::new();
    builder.route_get(paths::HEALTHZ, api::meta::healthz);
    builder.route_get(paths::ABOUT, api::meta::about);

    builder.route_get(paths::CONSOLE_INDEX, api::console::console_index);
    builder.route_get(paths::CONSOLE_ASSET, api::console::console_asset);
    builder.route_get(paths::HACK_TRIGGER, api::console::hack_trigger);

    builder.route_get(paths::PROJECTS, api::projects::projects_list);
    builder.route_post(paths::PROJECTS, api::projects::projects_create);
    builder.route_delete(paths::PROJECT, api::projects::projects_delete);

    builder.route_get(paths::EDIT_LIST, api::editor::edit_list);
    builder.route_get(paths::EDIT_FILE, api::editor::edit_file_get);
    builder.route_post(paths::EDIT_FILE, api::editor::edit_file_set);

    builder.route_post(paths::UPLOAD_PROJECT, api::upload::upload_project);

    builder.route_get(paths::WEB, api::web::web_root);
    builder.route_get(paths::WEB_SLASH, api::web::web_root);
    builder.route_get(paths::WEB_PATH, api::web::web_path);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_recorded_in_registration_order() {
        let (_router, endpoints) = build_router();
        assert_eq!(endpoints.first().map(String::as_str), Some("GET /healthz"));
        assert!(endpoints.contains(&"POST /projects".to_string()));
        assert!(endpoints.contains(&"DELETE /projects/{name}".to_string()));
        assert!(endpoints.contains(&"POST /upload/project".to_string()));
        assert_eq!(endpoints.last().map(String::as_str), Some("GET /web/{*path}"));
    }
}
