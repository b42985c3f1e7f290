//! Overlook Engine Library
//!
//! Procedural landscape scene behind a scroll-driven landing page:
//! noise-displaced terrain, billboarded props with per-frame
//! micro-motion, a pointer-parallax camera, and a warp/vignette post
//! pass, plus the panel navigation state machine the page chrome reads.
//!
//! # Modules
//!
//! - [`noise`] - Deterministic value noise and fractal sum
//! - [`terrain`] - Height sampler and the displaced, vertex-colored grid mesh
//! - [`camera`] - Fixed-base camera with smoothed pointer parallax
//! - [`props`] - Authored billboard placements and animation profiles
//! - [`scene`] - One-time scene composition, reflow, and sprite sizing
//! - [`panels`] - Panel deck state machine (wheel/swipe/select, debounce)
//! - [`assets`] - Sprite textures with pending/ready tracking
//! - [`render`] - wgpu passes: sky, terrain, sprites, warp post
//!
//! # Example
//!
//! ```ignore
//! use overlook_engine::camera::ParallaxCamera;
//! use overlook_engine::panels::{PanelNavigator, PanelSet};
//! use overlook_engine::scene::Scene;
//!
//! let mut camera = ParallaxCamera::new();
//! let mut scene = Scene::compose(&camera, 16.0 / 9.0);
//! let mut navigator = PanelNavigator::new(PanelSet::builtin()?);
//!
//! // per frame:
//! camera.tick();
//! // renderer.render(&gpu, &scene, &camera, &sprites, t)?;
//! ```

pub mod assets;
pub mod camera;
pub mod noise;
pub mod panels;
pub mod props;
pub mod render;
pub mod scene;
pub mod terrain;

// Re-export the types the host page touches every frame
pub use camera::ParallaxCamera;
pub use panels::{PanelNavigator, PanelSet, ScrollDirection};
pub use render::{GpuContext, GpuContextConfig, Renderer};
pub use scene::Scene;
