pub const CMD_START: &str = "<<CMD_START>>";
pub const CMD_END: &str = "<<CMD_END>>";

/// Returns the trimmed text between the first `<<CMD_START>>` and the first
/// `<<CMD_END>>`, or `None` when either marker is missing or the end marker
/// does not come after the start marker. An empty block is `Some("")`.
pub fn extract_command(response: &str) -> Option<String> {
    let start = response.find(CMD_START)?;
    let end = response.find(CMD_END)?;

    if start >= end {
        return None;
    }

    Some(response[start + CMD_START.len()..end].trim().to_string())
}
