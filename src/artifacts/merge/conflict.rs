use bytes::Bytes;

const CURRENT_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR: &[u8] = b"=======\n";
const TARGET_MARKER: &[u8] = b">>>>>>>\n";

/// Working content for a conflicted file
///
/// A side where the file is absent contributes nothing. No newline is added
/// after either side's content, so content without a trailing newline runs
/// straight into the next marker.
pub fn conflict_marker(current: Option<&[u8]>, target: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let target = target.unwrap_or_default();

    let mut content = Vec::with_capacity(
        CURRENT_MARKER.len() + current.len() + SEPARATOR.len() + target.len() + TARGET_MARKER.len(),
    );
    content.extend_from_slice(CURRENT_MARKER);
    content.extend_from_slice(current);
    content.extend_from_slice(SEPARATOR);
    content.extend_from_slice(target);
    content.extend_from_slice(TARGET_MARKER);

    Bytes::from(content)
}
