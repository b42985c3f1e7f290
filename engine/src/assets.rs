//! Sprite Asset Store
//!
//! Loads the billboard sprite images and tracks an explicit
//! pending/ready state per sprite kind. A sprite that has not decoded
//! yet renders with a 1x1 white placeholder and a square aspect; the
//! scene re-polls once per tick until every kind has resolved. A decode
//! failure is cosmetic, never fatal: the placeholder stays for the
//! page's lifetime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::props::PropKind;

/// Loaded GPU-side sprite.
pub struct SpriteEntry {
    pub aspect: f32,
    pub bind_group: wgpu::BindGroup,
}

enum SpriteSlot {
    /// Not attempted or not yet decodable
    Pending,
    Ready(SpriteEntry),
    /// Decode failed; placeholder forever
    Missing,
}

/// Natural width/height ratio, guarding degenerate images.
fn natural_aspect(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Per-kind sprite textures with pending/ready tracking.
pub struct SpriteStore {
    root: PathBuf,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    slots: HashMap<PropKind, SpriteSlot>,
    placeholder: wgpu::BindGroup,
}

/// Bind group layout for one sprite texture: texture at binding 0,
/// sampler at binding 1, fragment stage only.
pub fn sprite_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Sprite Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

impl SpriteStore {
    /// Create the store with every sprite kind pending. `root` is the
    /// directory asset paths resolve against.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, root: impl Into<PathBuf>) -> Self {
        let layout = sprite_bind_group_layout(device);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // 1x1 white placeholder for pending/missing sprites.
        let placeholder_texture =
            upload_rgba(device, queue, "Sprite Placeholder", 1, 1, &[255u8; 4]);
        let placeholder = bind_texture(device, &layout, &sampler, &placeholder_texture);

        let slots = PropKind::ALL
            .iter()
            .map(|&kind| (kind, SpriteSlot::Pending))
            .collect();

        Self {
            root: root.into(),
            layout,
            sampler,
            slots,
            placeholder,
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Attempt to load every still-pending sprite. Called once per tick
    /// until [`SpriteStore::all_resolved`] reports true.
    pub fn poll(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        for (&kind, slot) in &mut self.slots {
            if !matches!(slot, SpriteSlot::Pending) {
                continue;
            }
            let path = self.root.join(kind.sprite_path());
            match load_sprite(device, queue, &self.layout, &self.sampler, &path) {
                Ok(entry) => {
                    println!(
                        "[Assets] loaded {:?} (aspect {:.2}) from {}",
                        kind,
                        entry.aspect,
                        path.display()
                    );
                    *slot = SpriteSlot::Ready(entry);
                }
                Err(err) => {
                    println!("[Assets] {:?} unavailable, keeping placeholder: {err}", kind);
                    *slot = SpriteSlot::Missing;
                }
            }
        }
    }

    /// Natural aspect ratio, once known. Pending and missing sprites
    /// report `None` so billboards keep their square placeholder size.
    pub fn aspect(&self, kind: PropKind) -> Option<f32> {
        match self.slots.get(&kind) {
            Some(SpriteSlot::Ready(entry)) => Some(entry.aspect),
            _ => None,
        }
    }

    /// Bind group to draw this kind with; the placeholder when the
    /// sprite has not resolved.
    pub fn bind_group(&self, kind: PropKind) -> &wgpu::BindGroup {
        match self.slots.get(&kind) {
            Some(SpriteSlot::Ready(entry)) => &entry.bind_group,
            _ => &self.placeholder,
        }
    }

    /// True once no slot is pending (ready or missing both count).
    pub fn all_resolved(&self) -> bool {
        self.slots
            .values()
            .all(|slot| !matches!(slot, SpriteSlot::Pending))
    }
}

fn load_sprite(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    path: &Path,
) -> Result<SpriteEntry, String> {
    let img = image::open(path).map_err(|e| format!("failed to load image: {e}"))?;
    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());

    let texture = upload_rgba(device, queue, "Sprite Texture", width, height, &rgba);
    let bind_group = bind_texture(device, layout, sampler, &texture);

    Ok(SpriteEntry {
        aspect: natural_aspect(width, height),
        bind_group,
    })
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture
}

fn bind_texture(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    texture: &wgpu::Texture,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Sprite Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
