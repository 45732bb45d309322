use crate::error::ImageError;

/// Allocate a zero initialized pixel buffer of `len` bytes.
///
/// Allocation failures are reported instead of aborting the process.
///
/// # Errors
///
/// Returns [`ImageError::AllocationFailure`] if the memory cannot be reserved.
pub fn alloc_pixels(len: usize) -> Result<Vec<u8>, ImageError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| ImageError::AllocationFailure(len))?;
    data.resize(len, 0);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_zeroed() -> Result<(), ImageError> {
        let data = alloc_pixels(24)?;
        assert_eq!(data.len(), 24);
        assert!(data.iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn alloc_too_large() {
        assert_eq!(
            alloc_pixels(usize::MAX),
            Err(ImageError::AllocationFailure(usize::MAX))
        );
    }
}
