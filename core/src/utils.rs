/// Final path component of `name`, accepting both `/` and `\` separators.
///
/// `"/srv/in/test.file"` → `"test.file"`, `"dir/"` → `""`.
pub fn basename(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name)
}

/// Decode lowercase or uppercase hex into a fixed-size array.
pub fn decode_hex_array<const N: usize>(s: &str) -> Option<[u8; N]> {
    let bytes = hex::decode(s).ok()?;
    bytes.try_into().ok()
}

/// Data units for `len` input bytes: smallest `k` with `k * unit_len >= len`.
pub fn expected_unit_count(len: u64, unit_len: usize) -> u64 {
    len.div_ceil(unit_len as u64)
}

/// Descriptor records for `len` input bytes: the data units plus the
/// terminator. Also the number of IVs the stream draws.
pub fn expected_record_count(len: u64, unit_len: usize) -> u64 {
    expected_unit_count(len, unit_len) + 1
}
