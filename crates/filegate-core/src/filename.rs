//! File name helpers shared by staging and output.

const MAX_FILENAME_LEN: usize = 255;

/// Last path component of `file_name`, for either separator.
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim()
}

/// Reduce an untrusted file name to a safe base name.
///
/// Directory components (either separator) are dropped and every character
/// other than ASCII letters, digits and `.` becomes `_`. Over-long names lose
/// characters from the stem, never from the extension. Returns `None` when
/// nothing usable remains.
pub fn sanitize_filename(file_name: &str) -> Option<String> {
    let clean: String = base_name(file_name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();
    let clean = shorten(clean);

    if clean.chars().all(|c| c == '.' || c == '_') {
        None
    } else {
        Some(clean)
    }
}

// `name` is ASCII here, so byte offsets are char boundaries.
fn shorten(name: String) -> String {
    if name.len() <= MAX_FILENAME_LEN {
        return name;
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() < MAX_FILENAME_LEN - 1 => {
            let keep = MAX_FILENAME_LEN - ext.len() - 1;
            format!("{}.{}", &stem[..keep], ext)
        }
        _ => name[..MAX_FILENAME_LEN].to_string(),
    }
}

/// Lower-case extension after the last `.` of the last path component, if
/// any.
pub fn extension_of(file_name: &str) -> Option<String> {
    base_name(file_name)
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}
