/// Pipeline - Direct3D 12 root signature, pipeline state and vertex buffer

use std::any::Any;
use std::ffi::{c_void, CString};
use triangle_engine::triangle::Result;
use triangle_engine::triangle::render::{
    Pipeline as RendererPipeline,
    PipelineDesc, ShaderSource, VertexBufferView, PrimitiveTopology, Vertex,
};
use triangle_engine::{engine_bail, engine_debug, engine_err};
use windows::Win32::Foundation::FALSE;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::core::PCSTR;

use crate::d3d12_error::{HResultExt, LOG_SOURCE};
use crate::d3d12_format::{to_dxgi_format, to_topology_type};

/// Graphics pipeline bundled with the vertex buffer it draws
pub struct Pipeline {
    root_signature: ID3D12RootSignature,
    pso: ID3D12PipelineState,
    /// Kept alive for the GPU address in `view`
    _vertex_buffer: ID3D12Resource,
    view: VertexBufferView,
    vertex_count: u32,
    topology: PrimitiveTopology,
}

unsafe impl Send for Pipeline {}

impl Pipeline {
    pub(crate) fn new(device: &ID3D12Device, desc: &PipelineDesc<'_>) -> Result<Self> {
        if desc.vertices.is_empty() {
            engine_bail!(LOG_SOURCE, InvalidResource, "Pipeline needs at least one vertex");
        }

        let vertex_shader = shader_bytecode(desc.vertex_shader)?;
        let pixel_shader = shader_bytecode(desc.pixel_shader)?;

        let root_signature = create_root_signature(device)?;
        let pso = create_pipeline_state(device, &root_signature, desc, &vertex_shader, &pixel_shader)?;
        let (vertex_buffer, view) = create_vertex_buffer(device, desc.vertices)?;

        engine_debug!(LOG_SOURCE, "Pipeline created ({} vertices, {} + {} bytes of shader code)",
            desc.vertices.len(), vertex_shader.len(), pixel_shader.len());

        Ok(Self {
            root_signature,
            pso,
            _vertex_buffer: vertex_buffer,
            view,
            vertex_count: desc.vertices.len() as u32,
            topology: desc.topology,
        })
    }

    pub fn pso(&self) -> &ID3D12PipelineState {
        &self.pso
    }

    pub fn root_signature(&self) -> &ID3D12RootSignature {
        &self.root_signature
    }
}

impl RendererPipeline for Pipeline {
    fn vertex_buffer_view(&self) -> VertexBufferView {
        self.view
    }

    fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// SHADERS
// ============================================================================

/// Load bytecode, compiling HLSL sources on the way
fn shader_bytecode(source: &ShaderSource) -> Result<Vec<u8>> {
    let bytes = source.load()?;
    match source {
        ShaderSource::Bytecode { .. } => Ok(bytes),
        ShaderSource::Hlsl { path, entry_point, target } => {
            compile_hlsl(&bytes, &path.display().to_string(), entry_point, target)
        }
    }
}

fn compile_hlsl(source: &[u8], name: &str, entry_point: &str, target: &str) -> Result<Vec<u8>> {
    let to_cstring = |s: &str| {
        CString::new(s).map_err(|_| engine_err!(LOG_SOURCE, InvalidResource, "Shader string '{}' contains a NUL byte", s))
    };
    let name = to_cstring(name)?;
    let entry = to_cstring(entry_point)?;
    let target_c = to_cstring(target)?;

    let flags = if cfg!(feature = "shader-debug") {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        D3DCOMPILE_OPTIMIZATION_LEVEL3
    };

    let mut code: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;
    let result = unsafe {
        D3DCompile(
            source.as_ptr() as *const c_void,
            source.len(),
            PCSTR(name.as_ptr() as *const u8),
            None,
            None,
            PCSTR(entry.as_ptr() as *const u8),
            PCSTR(target_c.as_ptr() as *const u8),
            flags,
            0,
            &mut code,
            Some(&mut errors),
        )
    };

    if let Err(e) = result {
        let message = errors.as_ref().map(|blob| blob_to_string(blob)).unwrap_or_default();
        engine_bail!(LOG_SOURCE, InvalidResource,
            "Failed to compile {} ({} {}): {:?} {}", name.to_string_lossy(), entry_point, target, e, message.trim_end());
    }

    match code {
        Some(blob) => Ok(blob_to_bytes(&blob).to_vec()),
        None => engine_bail!(LOG_SOURCE, InvalidResource,
            "Compiling {} produced no bytecode", name.to_string_lossy()),
    }
}

fn blob_to_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

fn blob_to_string(blob: &ID3DBlob) -> String {
    String::from_utf8_lossy(blob_to_bytes(blob)).into_owned()
}

// ============================================================================
// ROOT SIGNATURE / PIPELINE STATE
// ============================================================================

/// Empty root signature, input assembler enabled
fn create_root_signature(device: &ID3D12Device) -> Result<ID3D12RootSignature> {
    let desc = D3D12_ROOT_SIGNATURE_DESC {
        Flags: D3D12_ROOT_SIGNATURE_FLAG_ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
        ..Default::default()
    };

    let mut signature: Option<ID3DBlob> = None;
    let mut errors: Option<ID3DBlob> = None;
    let result = unsafe {
        D3D12SerializeRootSignature(&desc, D3D_ROOT_SIGNATURE_VERSION_1, &mut signature, Some(&mut errors))
    };

    if let Err(e) = result {
        let message = errors.as_ref().map(|blob| blob_to_string(blob)).unwrap_or_default();
        engine_bail!(LOG_SOURCE, "Failed to serialize root signature: {:?} {}", e, message.trim_end());
    }
    let Some(signature) = signature else {
        engine_bail!(LOG_SOURCE, "Root signature serialization produced no blob");
    };

    unsafe { device.CreateRootSignature(0, blob_to_bytes(&signature)) }
        .or_engine("Failed to create root signature")
}

fn create_pipeline_state(
    device: &ID3D12Device,
    root_signature: &ID3D12RootSignature,
    desc: &PipelineDesc<'_>,
    vertex_shader: &[u8],
    pixel_shader: &[u8],
) -> Result<ID3D12PipelineState> {
    // Semantic names must outlive the CreateGraphicsPipelineState call
    let mut semantics = Vec::with_capacity(desc.input_layout.len());
    for element in desc.input_layout {
        match CString::new(element.semantic) {
            Ok(name) => semantics.push(name),
            Err(_) => engine_bail!(LOG_SOURCE, InvalidResource,
                "Invalid semantic name '{}'", element.semantic),
        }
    }

    let input_elements: Vec<D3D12_INPUT_ELEMENT_DESC> = desc.input_layout.iter()
        .zip(&semantics)
        .map(|(element, semantic)| D3D12_INPUT_ELEMENT_DESC {
            SemanticName: PCSTR(semantic.as_ptr() as *const u8),
            SemanticIndex: 0,
            Format: to_dxgi_format(element.format),
            InputSlot: 0,
            AlignedByteOffset: element.offset,
            InputSlotClass: D3D12_INPUT_CLASSIFICATION_PER_VERTEX_DATA,
            InstanceDataStepRate: 0,
        })
        .collect();

    let mut rtv_formats = [DXGI_FORMAT_UNKNOWN; 8];
    rtv_formats[0] = to_dxgi_format(desc.render_target_format);

    let pso_desc = D3D12_GRAPHICS_PIPELINE_STATE_DESC {
        pRootSignature: unsafe { std::mem::transmute_copy(root_signature) },
        VS: D3D12_SHADER_BYTECODE {
            pShaderBytecode: vertex_shader.as_ptr() as *const c_void,
            BytecodeLength: vertex_shader.len(),
        },
        PS: D3D12_SHADER_BYTECODE {
            pShaderBytecode: pixel_shader.as_ptr() as *const c_void,
            BytecodeLength: pixel_shader.len(),
        },
        InputLayout: D3D12_INPUT_LAYOUT_DESC {
            pInputElementDescs: input_elements.as_ptr(),
            NumElements: input_elements.len() as u32,
        },
        RasterizerState: D3D12_RASTERIZER_DESC {
            FillMode: D3D12_FILL_MODE_SOLID,
            CullMode: D3D12_CULL_MODE_BACK,
            DepthClipEnable: true.into(),
            ..Default::default()
        },
        BlendState: D3D12_BLEND_DESC {
            AlphaToCoverageEnable: FALSE,
            IndependentBlendEnable: FALSE,
            RenderTarget: [D3D12_RENDER_TARGET_BLEND_DESC {
                BlendEnable: FALSE,
                LogicOpEnable: FALSE,
                SrcBlend: D3D12_BLEND_ONE,
                DestBlend: D3D12_BLEND_ZERO,
                BlendOp: D3D12_BLEND_OP_ADD,
                SrcBlendAlpha: D3D12_BLEND_ONE,
                DestBlendAlpha: D3D12_BLEND_ZERO,
                BlendOpAlpha: D3D12_BLEND_OP_ADD,
                LogicOp: D3D12_LOGIC_OP_NOOP,
                RenderTargetWriteMask: D3D12_COLOR_WRITE_ENABLE_ALL.0 as u8,
            }; 8],
        },
        DepthStencilState: D3D12_DEPTH_STENCIL_DESC {
            DepthEnable: FALSE,
            StencilEnable: FALSE,
            ..Default::default()
        },
        SampleMask: u32::MAX,
        PrimitiveTopologyType: to_topology_type(desc.topology),
        NumRenderTargets: 1,
        RTVFormats: rtv_formats,
        SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
        ..Default::default()
    };

    unsafe { device.CreateGraphicsPipelineState(&pso_desc) }
        .or_engine("Failed to create pipeline state")
}

// ============================================================================
// VERTEX BUFFER
// ============================================================================

/// Upload-heap vertex buffer, written once at creation
fn create_vertex_buffer(device: &ID3D12Device, vertices: &[Vertex]) -> Result<(ID3D12Resource, VertexBufferView)> {
    let bytes: &[u8] = bytemuck::cast_slice(vertices);

    let heap_props = D3D12_HEAP_PROPERTIES {
        Type: D3D12_HEAP_TYPE_UPLOAD,
        ..Default::default()
    };
    let resource_desc = D3D12_RESOURCE_DESC {
        Dimension: D3D12_RESOURCE_DIMENSION_BUFFER,
        Width: bytes.len() as u64,
        Height: 1,
        DepthOrArraySize: 1,
        MipLevels: 1,
        SampleDesc: DXGI_SAMPLE_DESC { Count: 1, Quality: 0 },
        Layout: D3D12_TEXTURE_LAYOUT_ROW_MAJOR,
        ..Default::default()
    };

    let mut buffer: Option<ID3D12Resource> = None;
    unsafe {
        device.CreateCommittedResource(
            &heap_props,
            D3D12_HEAP_FLAG_NONE,
            &resource_desc,
            D3D12_RESOURCE_STATE_GENERIC_READ,
            None,
            &mut buffer,
        )
    }.or_engine("Failed to create vertex buffer")?;
    let Some(buffer) = buffer else {
        engine_bail!(LOG_SOURCE, "Vertex buffer creation returned no resource");
    };

    unsafe {
        let mut mapped: *mut c_void = std::ptr::null_mut();
        // Write-only: empty read range
        let read_range = D3D12_RANGE { Begin: 0, End: 0 };
        buffer.Map(0, Some(&read_range), Some(&mut mapped))
            .or_engine("Failed to map vertex buffer")?;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), mapped as *mut u8, bytes.len());
        buffer.Unmap(0, None);
    }

    let view = VertexBufferView {
        gpu_address: unsafe { buffer.GetGPUVirtualAddress() },
        size_in_bytes: bytes.len() as u32,
        stride_in_bytes: Vertex::STRIDE,
    };

    Ok((buffer, view))
}
