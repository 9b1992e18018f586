use crate::{ObjectError, ObjectType};

/// Split the `"<kind> <size>\0"` header off a framed object.
///
/// Returns `(kind, declared_size, header_len)` where `header_len` includes
/// the NUL.
pub fn parse_header(data: &[u8]) -> Result<(ObjectType, usize, usize), ObjectError> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ObjectError::CorruptObject("missing NUL after header".into()))?;
    let space = data[..nul]
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ObjectError::CorruptObject("missing space in header".into()))?;

    let obj_type = ObjectType::from_bytes(&data[..space])?;

    let size = std::str::from_utf8(&data[space + 1..nul])
        .ok()
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            ObjectError::CorruptObject(format!(
                "invalid size '{}'",
                String::from_utf8_lossy(&data[space + 1..nul])
            ))
        })?;

    Ok((obj_type, size, nul + 1))
}

/// Build `"<kind> <size>\0"`.
pub fn write_header(obj_type: ObjectType, size: usize) -> Vec<u8> {
    format!("{} {}\0", obj_type, size).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_blob_header() {
        let data = b"blob 12\0hello world!";
        let (ty, size, hdr_len) = parse_header(data).unwrap();
        assert_eq!(ty, ObjectType::Blob);
        assert_eq!(size, 12);
        assert_eq!(&data[hdr_len..], b"hello world!");
    }

    #[test]
    fn write_and_parse() {
        let hdr = write_header(ObjectType::Tree, 42);
        assert_eq!(hdr, b"tree 42\0");
        assert_eq!(parse_header(&hdr).unwrap(), (ObjectType::Tree, 42, hdr.len()));
    }

    #[test]
    fn missing_nul() {
        assert!(matches!(
            parse_header(b"blob 12"),
            Err(ObjectError::CorruptObject(_))
        ));
    }

    #[test]
    fn missing_space() {
        assert!(parse_header(b"blob12\0").is_err());
    }

    #[test]
    fn signed_or_empty_size_rejected() {
        assert!(parse_header(b"blob \0").is_err());
        assert!(parse_header(b"blob +1\0x").is_err());
        assert!(parse_header(b"blob abc\0").is_err());
    }
}
