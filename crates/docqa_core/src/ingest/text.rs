/// Decode raw bytes as UTF-8, falling back to Latin-1 when they are not valid UTF-8.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback cannot fail. Returns the text and whether the fallback was used.
pub fn decode_text(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), false),
        Err(_) => (bytes.iter().map(|&b| char::from(b)).collect(), true),
    }
}

/// Lowercased extension without the dot, if the name has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_latin1() {
        assert_eq!(decode_text("héllo".as_bytes()), ("héllo".to_string(), false));
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xE9]), ("café".to_string(), true));
    }

    #[test]
    fn extension_ignores_dotfiles_and_directories() {
        assert_eq!(extension_of("Notes.MD").as_deref(), Some("md"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of(".bashrc"), None);
        assert_eq!(extension_of("dir.d/README"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
