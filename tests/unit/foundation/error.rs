use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RasterFxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RasterFxError::allocation("x")
            .to_string()
            .contains("allocation error:")
    );
    assert!(
        RasterFxError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        RasterFxError::from(SurfaceStatus::NoMemory)
            .to_string()
            .contains("surface error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RasterFxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
