pub mod console;
pub mod editor;
pub mod http_utils;
pub mod meta;
pub mod projects;
pub mod upload;
pub mod web;
