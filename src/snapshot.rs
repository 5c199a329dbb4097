//! Background snapshot helpers.

/// MIME type assumed for bare base64 snapshot data.
pub const SNAPSHOT_MIME: &str = "image/jpeg";

/// Turn whatever the host page hands over into an `<img>` source.
///
/// `data:`, `blob:` and `http(s):` URLs pass through unchanged; anything
/// else is treated as bare base64 JPEG data.
pub fn snapshot_src(raw: &str) -> String {
    let raw = raw.trim();
    let is_url = ["data:", "blob:", "http://", "https://"]
        .iter()
        .any(|prefix| raw.starts_with(prefix));
    if is_url {
        raw.to_string()
    } else {
        format!("data:{SNAPSHOT_MIME};base64,{raw}")
    }
}

/// Native pixel size of an image file, read from its header.
#[cfg(not(target_arch = "wasm32"))]
pub fn image_size(path: &std::path::Path) -> crate::error::Result<(u32, u32)> {
    image::image_dimensions(path)
        .map_err(|e| crate::error::EditorError::ImageLoad(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_base64_gets_data_prefix() {
        assert_eq!(snapshot_src("/9j/4AAQ"), "data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(snapshot_src(" iVBORw0KGgo=\n"), "data:image/jpeg;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_urls_pass_through() {
        for src in [
            "data:image/png;base64,AAAA",
            "blob:http://localhost/1234",
            "https://cam.local/snapshot.jpg",
        ] {
            assert_eq!(snapshot_src(src), src);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_image_size_missing_file() {
        let err = image_size(std::path::Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, crate::error::EditorError::ImageLoad(_)));
    }
}
