/// Export of list data to CSV and browser downloads of exported files
use contracts::shared::api::Download;
use contracts::shared::metadata::EntityDescriptor;
use contracts::shared::record::Record;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8;";

/// CSV of the descriptor's list columns. The header row is always
/// present, so an empty list exports a header-only file.
pub fn build_csv(descriptor: &EntityDescriptor, rows: &[Record]) -> String {
    let fields: Vec<_> = descriptor.list_fields().collect();

    // UTF-8 BOM so Excel picks the right encoding
    let mut csv_content = String::from('\u{FEFF}');

    let headers: Vec<String> = fields.iter().map(|f| escape_csv_cell(f.ui.label)).collect();
    csv_content.push_str(&headers.join(","));
    csv_content.push_str("\r\n");

    for row in rows {
        let cells: Vec<String> = fields
            .iter()
            .map(|f| escape_csv_cell(&row.display(f.name)))
            .collect();
        csv_content.push_str(&cells.join(","));
        csv_content.push_str("\r\n");
    }

    csv_content
}

/// Client-side export of `rows`, named after the collection
pub fn csv_download(descriptor: &EntityDescriptor, rows: &[Record]) -> Download {
    Download {
        file_name: format!("{}.csv", descriptor.resource),
        content_type: CSV_CONTENT_TYPE.to_string(),
        bytes: build_csv(descriptor, rows).into_bytes(),
    }
}

/// Quote a cell containing the separator, quotes or line breaks
fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        let escaped = cell.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        cell.to_string()
    }
}

/// Hand an exported file to the browser
pub fn save_download(download: &Download) -> Result<(), String> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(download.bytes.as_slice()));

    let properties = BlobPropertyBag::new();
    properties.set_type(&download.content_type);

    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))?;
    download_blob(&blob, &download.file_name)
}

/// Trigger the download through a temporary anchor
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_department;
    use serde_json::json;

    #[test]
    fn test_header_only_for_empty_list() {
        let csv = build_csv(&a001_department::DESCRIPTOR, &[]);
        assert_eq!(
            csv,
            "\u{FEFF}ID,Department name,Department code,Status\r\n"
        );
    }

    #[test]
    fn test_rows_are_escaped() {
        let record = Record::from_value(json!({
            "department_id": 4,
            "department_name": "Stores, \"Main\"",
            "department_code": "ST01",
            "status": false
        }))
        .unwrap();
        let csv = build_csv(&a001_department::DESCRIPTOR, &[record]);
        let lines: Vec<_> = csv.split("\r\n").collect();
        assert_eq!(lines[1], "4,\"Stores, \"\"Main\"\"\",ST01,No");
    }

    #[test]
    fn test_download_named_after_resource() {
        let download = csv_download(&a001_department::DESCRIPTOR, &[]);
        assert_eq!(download.file_name, "department.csv");
        assert_eq!(download.content_type, CSV_CONTENT_TYPE);
    }
}
