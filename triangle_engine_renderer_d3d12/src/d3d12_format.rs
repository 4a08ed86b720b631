/// Engine format and topology to DXGI / D3D12 conversions

use triangle_engine::triangle::render::{Format, PrimitiveTopology};
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;

pub(crate) fn to_dxgi_format(format: Format) -> DXGI_FORMAT {
    match format {
        Format::R8G8B8A8_UNORM => DXGI_FORMAT_R8G8B8A8_UNORM,
        Format::B8G8R8A8_UNORM => DXGI_FORMAT_B8G8R8A8_UNORM,
        Format::R32G32_FLOAT => DXGI_FORMAT_R32G32_FLOAT,
        Format::R32G32B32_FLOAT => DXGI_FORMAT_R32G32B32_FLOAT,
        Format::R32G32B32A32_FLOAT => DXGI_FORMAT_R32G32B32A32_FLOAT,
    }
}

pub(crate) fn to_d3d_topology(topology: PrimitiveTopology) -> D3D_PRIMITIVE_TOPOLOGY {
    match topology {
        PrimitiveTopology::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
        PrimitiveTopology::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
        PrimitiveTopology::LineList => D3D_PRIMITIVE_TOPOLOGY_LINELIST,
        PrimitiveTopology::PointList => D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
    }
}

/// Topology class the pipeline state is compiled for
pub(crate) fn to_topology_type(topology: PrimitiveTopology) -> D3D12_PRIMITIVE_TOPOLOGY_TYPE {
    match topology {
        PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip => D3D12_PRIMITIVE_TOPOLOGY_TYPE_TRIANGLE,
        PrimitiveTopology::LineList => D3D12_PRIMITIVE_TOPOLOGY_TYPE_LINE,
        PrimitiveTopology::PointList => D3D12_PRIMITIVE_TOPOLOGY_TYPE_POINT,
    }
}

#[cfg(test)]
#[path = "d3d12_format_tests.rs"]
mod tests;
