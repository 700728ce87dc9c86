//! Wire-level contract of the REST backend
//!
//! Collection endpoints follow one convention for every entity:
//! `GET /api/<resource>/` (paginated with `page`, `page_size`, `search`),
//! `GET|PUT|PATCH|DELETE /api/<resource>/?id=<id>`, `POST /api/<resource>/`,
//! plus `/api/upload-<resource>/` and `/api/download-<resource>/` for bulk
//! spreadsheets.

mod download;
mod error;
mod import;
mod list;

pub use download::{filename_from_content_disposition, resolve_download_name, Download};
pub use error::{ApiError, ErrorKind};
pub use import::ImportResult;
pub use list::{parse_list_body, parse_single_body, ListQuery, Page, DEFAULT_PAGE_SIZE};
