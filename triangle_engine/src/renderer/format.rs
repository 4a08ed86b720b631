/// Render-target and vertex attribute formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Format {
    // Render-target formats
    R8G8B8A8_UNORM,
    B8G8R8A8_UNORM,

    // Vertex attribute formats
    R32G32_FLOAT,
    R32G32B32_FLOAT,
    R32G32B32A32_FLOAT,
}

impl Format {
    /// Size in bytes of one element
    pub fn size_bytes(self) -> u32 {
        match self {
            Format::R8G8B8A8_UNORM | Format::B8G8R8A8_UNORM => 4,
            Format::R32G32_FLOAT => 8,
            Format::R32G32B32_FLOAT => 12,
            Format::R32G32B32A32_FLOAT => 16,
        }
    }
}
